use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::Field;
use crate::export;
use crate::state::{Alert, AppState, Dialog};
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu bar with the About / How to Use buttons.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, theme: &Theme) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open model directory…").clicked() {
                open_model_dir_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload models").clicked() {
                state.reload_and_report();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export CSV…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if colored_button(ui, "About", theme.about_button).clicked() {
            state.dialog = Some(Dialog::About);
        }
        if colored_button(ui, "How to Use", theme.help_button).clicked() {
            state.dialog = Some(Dialog::HowToUse);
        }

        if let Some(err) = &state.model_error {
            ui.separator();
            ui.label(RichText::new("Models not loaded").color(theme.error))
                .on_hover_text(err.as_str());
        }
    });
}

// ---------------------------------------------------------------------------
// Banner
// ---------------------------------------------------------------------------

/// Banner image, or a red notice when the file is not there.
pub fn banner(ui: &mut Ui, path: &Path, theme: &Theme) {
    ui.vertical_centered(|ui: &mut Ui| {
        if path.is_file() {
            let uri = format!("file://{}", path.display());
            ui.add(egui::Image::new(uri).max_width(500.0).max_height(100.0));
        } else {
            ui.label(RichText::new("Logo not available.").color(theme.error));
        }
    });
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Input form
// ---------------------------------------------------------------------------

/// One row per field: label, grey description, entry.
pub fn input_form(ui: &mut Ui, state: &mut AppState, theme: &Theme) {
    egui::Grid::new("input_form")
        .num_columns(2)
        .spacing([20.0, 2.0])
        .striped(false)
        .show(ui, |ui: &mut Ui| {
            for field in Field::ALL {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(field.label());
                    ui.label(
                        RichText::new(field.description())
                            .italics()
                            .small()
                            .color(theme.hint),
                    );
                });
                let response = ui.add(
                    egui::TextEdit::singleline(state.inputs.text_mut(field))
                        .desired_width(180.0),
                );
                if response.changed() {
                    state.on_input_changed(field);
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

pub fn derived_values(ui: &mut Ui, state: &AppState, theme: &Theme) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Clay (%):");
        ui.label(RichText::new(state.clay_text()).strong().color(theme.value));
        ui.add_space(20.0);
        ui.label("Plasticity Index:");
        ui.label(
            RichText::new(state.plasticity_index_text())
                .strong()
                .color(theme.value),
        );
    });
    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(theme.error));
    }
}

// ---------------------------------------------------------------------------
// Actions and results
// ---------------------------------------------------------------------------

/// Predict and Copy All buttons.
pub fn actions(ui: &mut Ui, state: &mut AppState, theme: &Theme) {
    ui.horizontal(|ui: &mut Ui| {
        if colored_button(ui, "Predict OMC & MDD", theme.predict_button).clicked() {
            state.predict();
        }
        if colored_button(ui, "Copy All", theme.copy_button).clicked() {
            ui.ctx().copy_text(state.copy_all_text());
            state.alert = Some(Alert::info(
                "Copied",
                "All inputs and results copied to clipboard!",
            ));
        }
    });
}

pub fn results(ui: &mut Ui, state: &AppState, theme: &Theme) {
    let text = state.result_text();
    if text.is_empty() {
        return;
    }
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(text).size(16.0).strong().color(theme.value));
    });
}

pub fn footer(ui: &mut Ui, theme: &Theme) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("Developed by Rod WIll").italics().color(theme.hint));
    });
}

fn colored_button(ui: &mut Ui, text: &str, fill: Color32) -> egui::Response {
    ui.add(egui::Button::new(RichText::new(text).color(Color32::WHITE)).fill(fill))
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_model_dir_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Select model directory")
        .set_directory(&state.model_paths.dir)
        .pick_folder();

    if let Some(dir) = dir {
        log::info!("Switching model directory to {}", dir.display());
        state.set_model_dir(dir);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export sample")
        .add_filter("CSV", &["csv"])
        .set_file_name("sample.csv")
        .save_file();

    if let Some(path) = file {
        match export::export_csv(state, &path) {
            Ok(()) => {
                state.alert = Some(Alert::info(
                    "Exported",
                    format!("Sample written to {}", path.display()),
                ));
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.alert = Some(Alert::error("Error", format!("Error exporting data: {e:#}")));
            }
        }
    }
}
