use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::Field;
use crate::prediction::PredictionStage;

// ---------------------------------------------------------------------------
// Validation – raw inputs and derived features
// ---------------------------------------------------------------------------

/// A derived value outside its physical range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeError {
    #[error("The sum of Gravel, Sand, and Silt cannot exceed 100%.")]
    ClayBelowZero(f64),
    #[error("Clay cannot exceed 100% (got {0:.2}%); Gravel, Sand, and Silt cannot be negative.")]
    ClayAboveHundred(f64),
    #[error("Plasticity Index cannot be negative.")]
    NegativePlasticityIndex(f64),
    #[error("{0} is out of range.")]
    NotFinite(&'static str),
}

/// A raw input that cannot be used, or a derived value that violates its range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please fill in the {0}.")]
    Missing(Field),
    #[error("{field} must be a number (got '{text}').")]
    NotNumeric { field: Field, text: String },
    #[error(transparent)]
    Range(#[from] RangeError),
}

// ---------------------------------------------------------------------------
// Model loading
// ---------------------------------------------------------------------------

/// A model artifact could not be turned into a usable regressor.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse model artifact {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("incompatible model artifact {}: {reason}", .path.display())]
    Incompatible { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::Incompatible { path, .. } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// A model invocation failed. Never names which of the two models raised it.
#[derive(Debug, Error)]
#[error("Error during prediction: {message}")]
pub struct InferenceError {
    message: String,
}

impl InferenceError {
    pub fn new(cause: &anyhow::Error) -> Self {
        Self {
            message: format!("{cause:#}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction request
// ---------------------------------------------------------------------------

/// Terminal failure of a single prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{source}")]
    Validation {
        stage: PredictionStage,
        #[source]
        source: ValidationError,
    },
    #[error("{source}")]
    Inference {
        #[source]
        source: InferenceError,
    },
}

impl PredictError {
    /// Stage the request was in when it moved to `Failed`.
    pub fn stage(&self) -> PredictionStage {
        match self {
            PredictError::Validation { stage, .. } => *stage,
            PredictError::Inference { .. } => PredictionStage::Inferring,
        }
    }

    #[cfg(test)]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            PredictError::Validation { source, .. } => Some(source),
            PredictError::Inference { .. } => None,
        }
    }

    /// Title for the message box shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            PredictError::Validation { .. } => "Input Error",
            PredictError::Inference { .. } => "Prediction Error",
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid colour '{value}' for theme.{key}: {reason}")]
    Colour {
        key: &'static str,
        value: String,
        reason: String,
    },
}
