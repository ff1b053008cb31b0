use std::fmt;
use std::sync::Arc;

use crate::data::derive::{derive_features, preview_clay, preview_plasticity_index};
use crate::data::model::{FeatureVector, Prediction, RawInputs, ValidatedInputs};
use crate::error::{InferenceError, PredictError, ValidationError};
use crate::regression::ModelPair;

// ---------------------------------------------------------------------------
// Request stages
// ---------------------------------------------------------------------------

/// Where a single prediction request is. Any failure goes straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionStage {
    Idle,
    Validating,
    Deriving,
    Vectorizing,
    Inferring,
    Completed,
    Failed,
}

impl fmt::Display for PredictionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PredictionStage::Idle => "idle",
            PredictionStage::Validating => "validating",
            PredictionStage::Deriving => "deriving",
            PredictionStage::Vectorizing => "vectorizing",
            PredictionStage::Inferring => "inferring",
            PredictionStage::Completed => "completed",
            PredictionStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the stage of one request and logs every transition.
struct Request {
    stage: PredictionStage,
}

impl Request {
    fn new() -> Self {
        Self {
            stage: PredictionStage::Idle,
        }
    }

    fn advance(&mut self, next: PredictionStage) {
        log::debug!("prediction: {} -> {}", self.stage, next);
        self.stage = next;
    }

    fn reject(&mut self, source: ValidationError) -> PredictError {
        let stage = self.stage;
        self.advance(PredictionStage::Failed);
        PredictError::Validation { stage, source }
    }
}

// ---------------------------------------------------------------------------
// PredictionService
// ---------------------------------------------------------------------------

/// Holds the loaded models and turns raw inputs into OMC/MDD.
#[derive(Debug, Clone)]
pub struct PredictionService {
    models: Arc<ModelPair>,
}

impl PredictionService {
    pub fn new(models: ModelPair) -> Self {
        Self {
            models: Arc::new(models),
        }
    }

    pub fn predict(&self, raw: &RawInputs) -> Result<Prediction, PredictError> {
        predict(raw, &self.models)
    }
}

/// Run one prediction request to completion or to its first failure.
///
/// Derived values are recomputed from `raw` rather than taken from any
/// previously displayed value.
pub fn predict(raw: &RawInputs, models: &ModelPair) -> Result<Prediction, PredictError> {
    let mut request = Request::new();

    // Derived-value range checks (preview mode) come before the
    // every-field-present check.
    request.advance(PredictionStage::Validating);
    if let Err(e) = preview_clay(raw).and_then(|_| preview_plasticity_index(raw)) {
        return Err(request.reject(e));
    }
    let inputs = ValidatedInputs::from_raw(raw).map_err(|e| request.reject(e))?;

    request.advance(PredictionStage::Deriving);
    let derived = derive_features(&inputs).map_err(|e| request.reject(e))?;

    request.advance(PredictionStage::Vectorizing);
    let features = FeatureVector::assemble(&inputs, &derived);

    request.advance(PredictionStage::Inferring);
    let (omc, mdd) = match models.predict(&features) {
        Ok(outputs) => outputs,
        Err(cause) => {
            log::error!("Model inference failed: {cause:#}");
            request.advance(PredictionStage::Failed);
            return Err(PredictError::Inference {
                source: InferenceError::new(&cause),
            });
        }
    };

    request.advance(PredictionStage::Completed);
    let prediction = Prediction { omc, mdd };
    log::info!("Predicted OMC {omc:.2}%, MDD {mdd:.2} g/cm³");
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::bail;

    use super::*;
    use crate::data::model::Field;
    use crate::error::RangeError;
    use crate::regression::Regressor;

    /// Records every row it sees and answers with a fixed function of it.
    struct Recording {
        seen: Arc<Mutex<Vec<Vec<f64>>>>,
        scale: f64,
    }

    impl Regressor for Recording {
        fn predict(&self, features: &[f64]) -> anyhow::Result<f64> {
            self.seen.lock().unwrap().push(features.to_vec());
            Ok(features.iter().sum::<f64>() * self.scale)
        }
    }

    struct Failing;

    impl Regressor for Failing {
        fn predict(&self, _features: &[f64]) -> anyhow::Result<f64> {
            bail!("shape mismatch")
        }
    }

    fn recording_pair() -> (ModelPair, Arc<Mutex<Vec<Vec<f64>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pair = ModelPair::new(
            Box::new(Recording {
                seen: seen.clone(),
                scale: 0.01,
            }),
            Box::new(Recording {
                seen: seen.clone(),
                scale: 0.001,
            }),
        );
        (pair, seen)
    }

    fn sample() -> RawInputs {
        RawInputs::from_pairs([
            (Field::Gravel, "20"),
            (Field::Sand, "30"),
            (Field::Silt, "25"),
            (Field::LiquidLimit, "40"),
            (Field::PlasticLimit, "20"),
            (Field::CompactionEnergy, "600"),
        ])
    }

    #[test]
    fn both_models_see_the_same_ordered_vector() {
        let (pair, seen) = recording_pair();
        let prediction = predict(&sample(), &pair).unwrap();

        let expected = vec![20.0, 30.0, 25.0, 40.0, 20.0, 600.0, 20.0, 25.0];
        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![expected.clone(), expected]);
        assert!((prediction.omc - 7.8).abs() < 1e-9);
        assert!((prediction.mdd - 0.78).abs() < 1e-9);
    }

    #[test]
    fn prediction_is_deterministic() {
        let (pair, _) = recording_pair();
        let service = PredictionService::new(pair);
        let first = service.predict(&sample()).unwrap();
        let second = service.predict(&sample()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_field_is_named_and_no_model_runs() {
        for field in Field::ALL {
            let (pair, seen) = recording_pair();
            let mut raw = sample();
            raw.set(field, "");

            let err = predict(&raw, &pair).unwrap_err();
            assert_eq!(err.validation(), Some(&ValidationError::Missing(field)));
            assert_eq!(err.stage(), PredictionStage::Validating);
            assert_eq!(err.title(), "Input Error");
            assert!(seen.lock().unwrap().is_empty(), "{field} blank ran a model");
        }
    }

    #[test]
    fn range_errors_win_over_missing_fields() {
        let (pair, seen) = recording_pair();
        let mut raw = sample();
        raw.set(Field::Gravel, "");
        raw.set(Field::Sand, "90");

        let err = predict(&raw, &pair).unwrap_err();
        assert_eq!(err.stage(), PredictionStage::Validating);
        assert!(matches!(
            err.validation(),
            Some(ValidationError::Range(RangeError::ClayBelowZero(_)))
        ));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn negative_plasticity_index_aborts() {
        let (pair, _) = recording_pair();
        let mut raw = sample();
        raw.set(Field::PlasticLimit, "45");

        let err = predict(&raw, &pair).unwrap_err();
        assert_eq!(
            err.validation(),
            Some(&ValidationError::Range(RangeError::NegativePlasticityIndex(-5.0)))
        );
    }

    #[test]
    fn any_model_failure_is_one_inference_error() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pair = ModelPair::new(
            Box::new(Recording {
                seen: seen.clone(),
                scale: 1.0,
            }),
            Box::new(Failing),
        );

        let err = predict(&sample(), &pair).unwrap_err();
        assert!(matches!(err, PredictError::Inference { .. }));
        assert_eq!(err.stage(), PredictionStage::Inferring);
        assert!(err.to_string().contains("shape mismatch"));
    }
}
