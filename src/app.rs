use std::path::PathBuf;

use eframe::egui;

use crate::state::AppState;
use crate::theme::Theme;
use crate::ui::{dialogs, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PredictorApp {
    pub state: AppState,
    theme: Theme,
    banner: PathBuf,
}

impl PredictorApp {
    pub fn new(state: AppState, theme: Theme, banner: PathBuf) -> Self {
        Self {
            state,
            theme,
            banner,
        }
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let background = self.theme.background;

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar")
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(background))
            .show(ctx, |ui| {
                panels::top_bar(ui, &mut self.state, &self.theme);
            });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(background))
            .show(ctx, |ui| {
                panels::footer(ui, &self.theme);
            });

        // ---- Central panel: form and results ----
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).fill(background))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        panels::banner(ui, &self.banner, &self.theme);
                        panels::input_form(ui, &mut self.state, &self.theme);
                        ui.add_space(10.0);
                        panels::derived_values(ui, &self.state, &self.theme);
                        ui.add_space(20.0);
                        ui.vertical_centered(|ui| {
                            panels::actions(ui, &mut self.state, &self.theme);
                        });
                        ui.add_space(10.0);
                        panels::results(ui, &self.state, &self.theme);
                    });
            });

        // ---- Modal windows ----
        dialogs::show(ctx, &mut self.state, &self.theme);
    }
}
