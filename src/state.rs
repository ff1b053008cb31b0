use std::fmt;

use crate::config::ModelPaths;
use crate::data::derive::{preview_clay, preview_plasticity_index};
use crate::data::model::{Field, Prediction, RawInputs};
use crate::error::{RangeError, ValidationError};
use crate::prediction::PredictionService;
use crate::regression::loader::load_models;

// ---------------------------------------------------------------------------
// Derived value display
// ---------------------------------------------------------------------------

/// What a derived-value label currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedDisplay {
    /// Inputs not there yet.
    NotApplicable,
    Value(f64),
    /// Out of physical range.
    Invalid,
    /// An input could not be parsed.
    InvalidInput,
}

impl DerivedDisplay {
    fn render(&self, unit: &str) -> String {
        match self {
            DerivedDisplay::NotApplicable => "N/A".to_string(),
            DerivedDisplay::Value(v) => format!("{v:.2}{unit}"),
            DerivedDisplay::Invalid => "Invalid".to_string(),
            DerivedDisplay::InvalidInput => "Invalid Input".to_string(),
        }
    }
}

/// Range errors mark the label `Invalid` and are reported; unparsable text
/// only marks the label.
fn classify(
    e: ValidationError,
    unparsable: DerivedDisplay,
) -> (DerivedDisplay, Option<RangeError>) {
    match e {
        ValidationError::Range(range) => (DerivedDisplay::Invalid, Some(range)),
        _ => (unparsable, None),
    }
}

// ---------------------------------------------------------------------------
// Message boxes and dialogs
// ---------------------------------------------------------------------------

/// A modal message, the egui stand-in for a message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl Alert {
    pub fn error(title: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            title: title.into(),
            message: message.to_string(),
            is_error: true,
        }
    }

    pub fn info(title: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            title: title.into(),
            message: message.to_string(),
            is_error: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    About,
    HowToUse,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Entry texts.
    pub inputs: RawInputs,

    pub clay: DerivedDisplay,
    pub plasticity_index: DerivedDisplay,

    /// Last successful prediction; cleared on any failure.
    pub result: Option<Prediction>,

    /// Models in use (None while they failed to load).
    pub service: Option<PredictionService>,
    pub model_paths: ModelPaths,
    pub model_error: Option<String>,

    /// Live validation message shown under the derived values.
    pub status_message: Option<String>,
    clay_range_error: Option<RangeError>,
    plasticity_index_range_error: Option<RangeError>,

    pub alert: Option<Alert>,
    pub dialog: Option<Dialog>,
}

impl AppState {
    /// Fresh state with models loaded from `model_paths`.
    pub fn new(model_paths: ModelPaths) -> Self {
        let mut state = Self::without_models(model_paths);
        state.reload_models();
        state
    }

    /// Fresh state with no models loaded yet.
    pub fn without_models(model_paths: ModelPaths) -> Self {
        Self {
            inputs: RawInputs::default(),
            clay: DerivedDisplay::NotApplicable,
            plasticity_index: DerivedDisplay::NotApplicable,
            result: None,
            service: None,
            model_paths,
            model_error: None,
            status_message: None,
            clay_range_error: None,
            plasticity_index_range_error: None,
            alert: None,
            dialog: None,
        }
    }

    /// Install an already loaded service.
    pub fn set_service(&mut self, service: PredictionService) {
        self.service = Some(service);
        self.model_error = None;
    }

    /// (Re)load both models from `model_paths`. A failure keeps no models.
    pub fn reload_models(&mut self) -> bool {
        match load_models(&self.model_paths) {
            Ok(pair) => {
                self.set_service(PredictionService::new(pair));
                true
            }
            Err(e) => {
                log::error!("Failed to load models ({}): {e:#}", e.path().display());
                self.service = None;
                self.result = None;
                self.model_error = Some(e.to_string());
                false
            }
        }
    }

    /// Point at a different model directory and reload.
    pub fn set_model_dir(&mut self, dir: std::path::PathBuf) {
        self.model_paths = self.model_paths.with_dir(dir);
        self.reload_and_report();
    }

    /// Reload and tell the user how it went.
    pub fn reload_and_report(&mut self) {
        if self.reload_models() {
            self.alert = Some(Alert::info(
                "Models",
                format!("Models loaded from {}", self.model_paths.dir.display()),
            ));
        } else if let Some(e) = &self.model_error {
            self.alert = Some(Alert::error("Error", format!("Error loading models: {e}")));
        }
    }

    // -- live derivation --

    /// React to an edit of one entry.
    pub fn on_input_changed(&mut self, field: Field) {
        match field {
            Field::Gravel | Field::Sand | Field::Silt => self.refresh_clay(),
            Field::LiquidLimit | Field::PlasticLimit => self.refresh_plasticity_index(),
            Field::CompactionEnergy => {}
        }
    }

    pub fn refresh_derived(&mut self) {
        self.refresh_clay();
        self.refresh_plasticity_index();
    }

    fn refresh_clay(&mut self) {
        let (display, range_error) = match preview_clay(&self.inputs) {
            Ok(clay) => (DerivedDisplay::Value(clay), None),
            Err(e) => classify(e, DerivedDisplay::Invalid),
        };
        self.clay = display;
        self.clay_range_error = range_error;
        self.rebuild_status();
    }

    fn refresh_plasticity_index(&mut self) {
        let (display, range_error) = match preview_plasticity_index(&self.inputs) {
            Ok(Some(pi)) => (DerivedDisplay::Value(pi), None),
            Ok(None) => (DerivedDisplay::NotApplicable, None),
            Err(e) => classify(e, DerivedDisplay::InvalidInput),
        };
        self.plasticity_index = display;
        self.plasticity_index_range_error = range_error;
        self.rebuild_status();
    }

    /// One line per range error that is still present, Clay first.
    fn rebuild_status(&mut self) {
        let lines: Vec<String> = [self.clay_range_error, self.plasticity_index_range_error]
            .into_iter()
            .flatten()
            .map(|e| e.to_string())
            .collect();
        self.status_message = (!lines.is_empty()).then(|| lines.join("\n"));
    }

    // -- prediction --

    /// Run a prediction on the current inputs and record the outcome.
    pub fn predict(&mut self) {
        if self.service.is_none() && !self.reload_models() {
            let e = self.model_error.clone().unwrap_or_default();
            self.alert = Some(Alert::error("Error", format!("Error loading models: {e}")));
            return;
        }
        self.refresh_derived();

        let Some(service) = &self.service else {
            return;
        };
        match service.predict(&self.inputs) {
            Ok(prediction) => {
                self.result = Some(prediction);
            }
            Err(e) => {
                log::warn!("Prediction failed at {}: {e}", e.stage());
                self.result = None;
                self.alert = Some(Alert::error(e.title(), &e));
            }
        }
    }

    // -- rendering helpers --

    pub fn clay_text(&self) -> String {
        self.clay.render("%")
    }

    pub fn plasticity_index_text(&self) -> String {
        self.plasticity_index.render("")
    }

    pub fn result_text(&self) -> String {
        self.result.map(|p| p.to_string()).unwrap_or_default()
    }

    /// Everything on screen as plain text, one `label: value` per line.
    pub fn copy_all_text(&self) -> String {
        let mut lines: Vec<String> = self
            .inputs
            .iter()
            .map(|(field, text)| format!("{field}: {text}"))
            .collect();
        lines.push(format!("Clay: {}", self.clay_text()));
        lines.push(format!("Plasticity Index: {}", self.plasticity_index_text()));
        lines.push(format!("\nResults:\n{}", self.result_text()));
        lines.join("\n")
    }
}
