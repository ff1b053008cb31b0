use std::path::Path;

use crate::config::ModelPaths;
use crate::error::LoadError;

use super::artifact::ModelArtifact;
use super::{ModelPair, Regressor};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the OMC and MDD models. Either both load or the call fails.
pub fn load_models(paths: &ModelPaths) -> Result<ModelPair, LoadError> {
    let omc = load_regressor(&paths.omc_path())?;
    let mdd = load_regressor(&paths.mdd_path())?;
    Ok(ModelPair::new(omc, mdd))
}

/// Read, parse and validate a single artifact.
pub fn load_regressor(path: &Path) -> Result<Box<dyn Regressor>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ModelArtifact =
        serde_json::from_str(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let summary = artifact.model.summary();
    let target = artifact.target.clone().unwrap_or_else(|| "?".to_string());
    let regressor = artifact
        .into_regressor()
        .map_err(|reason| LoadError::Incompatible {
            path: path.to_path_buf(),
            reason,
        })?;

    log::info!(
        "Loaded {target} model from {} ({summary})",
        path.display()
    );
    Ok(regressor)
}
