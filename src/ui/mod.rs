pub mod dialogs;
pub mod panels;
