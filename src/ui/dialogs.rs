use eframe::egui::{self, Align2, RichText, Ui};

use crate::state::{AppState, Dialog};
use crate::theme::Theme;

const ABOUT_TEXT: &str = "This application predicts the Optimum Moisture Content (OMC) and \
Maximum Dry Density (MDD) for soil compaction based on soil properties. \
Designed and developed by Willie Roy.";

const HOW_TO_USE_TEXT: &str = "1. Enter the percentages for Gravel, Sand, and Silt.\n\
2. Enter the Liquid Limit, Plastic Limit, and Compaction Energy.\n\
3. The values for Clay and Plasticity Index will be calculated automatically.\n\
4. Click 'Predict OMC & MDD' to get results.\n\
5. Use the 'Copy All' button to save the inputs and results.";

/// Render the open info dialog and the pending alert, if any.
pub fn show(ctx: &egui::Context, state: &mut AppState, theme: &Theme) {
    if let Some(dialog) = state.dialog {
        let (title, text) = match dialog {
            Dialog::About => ("About This Application", ABOUT_TEXT),
            Dialog::HowToUse => ("How to Use", HOW_TO_USE_TEXT),
        };
        if message_window(ctx, title, |ui: &mut Ui| {
            ui.label(text);
        }) {
            state.dialog = None;
        }
    }

    if let Some(alert) = &state.alert {
        let color = if alert.is_error { theme.error } else { theme.value };
        let message = alert.message.clone();
        if message_window(ctx, &alert.title, |ui: &mut Ui| {
            ui.label(RichText::new(message).color(color));
        }) {
            state.alert = None;
        }
    }
}

/// Centered window with an OK button. Returns true once dismissed.
fn message_window(ctx: &egui::Context, title: &str, body: impl FnOnce(&mut Ui)) -> bool {
    let mut open = true;
    let mut dismissed = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui: &mut Ui| {
            ui.set_max_width(360.0);
            body(ui);
            ui.add_space(8.0);
            ui.vertical_centered(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });
    dismissed || !open
}
