mod app;
mod config;
mod data;
mod error;
mod export;
mod prediction;
mod regression;
mod state;
mod theme;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::PredictorApp;
use config::AppConfig;
use eframe::egui;
use state::AppState;
use theme::Theme;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    let theme = Theme::from_config(&config.theme).unwrap_or_else(|e| {
        log::warn!("{e}, using default colours");
        Theme::default()
    });

    // Models load once; the File menu can reload them.
    let state = AppState::new(config.models.clone());

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([config.window.width, config.window.height])
        .with_min_inner_size([450.0, 500.0]);
    match load_icon(&config.window.icon) {
        Ok(icon) => viewport = viewport.with_icon(icon),
        Err(e) => log::warn!("{e:#}"),
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let banner = config.window.banner;
    eframe::run_native(
        "OMC and MDD Prediction Application",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the banner png.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(PredictorApp::new(state, theme, banner)))
        }),
    )
}

fn load_icon(path: &Path) -> anyhow::Result<egui::IconData> {
    let image = image::open(path)
        .with_context(|| format!("loading window icon {}", path.display()))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Ok(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}
