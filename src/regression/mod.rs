/// Regression models: the `Regressor` seam plus the JSON artifact adapter.
///
/// The prediction pipeline only ever sees `dyn Regressor`; the on-disk
/// format lives in [`artifact`] and loading in [`loader`].

pub mod artifact;
pub mod loader;

use std::fmt;

use crate::data::model::FeatureVector;

/// Anything that maps one feature row to one scalar.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> anyhow::Result<f64>;
}

/// The OMC and MDD models, loaded together and read-only afterwards.
pub struct ModelPair {
    omc: Box<dyn Regressor>,
    mdd: Box<dyn Regressor>,
}

impl ModelPair {
    pub fn new(omc: Box<dyn Regressor>, mdd: Box<dyn Regressor>) -> Self {
        Self { omc, mdd }
    }

    /// Run both models on the same row, OMC first.
    pub fn predict(&self, features: &FeatureVector) -> anyhow::Result<(f64, f64)> {
        let omc = self.omc.predict(features.as_slice())?;
        let mdd = self.mdd.predict(features.as_slice())?;
        Ok((omc, mdd))
    }
}

impl fmt::Debug for ModelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelPair").finish_non_exhaustive()
    }
}
