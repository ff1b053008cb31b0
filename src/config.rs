//! Application configuration loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `OMC_MDD_CONFIG` environment variable (path to TOML file)
//! 2. `omc_mdd.toml` in the current working directory
//! 3. Built-in defaults (the original application's paths and colours)
//!
//! A file that cannot be read or parsed is logged and skipped; startup never
//! fails because of configuration.
//!
//! ```toml
//! [models]
//! dir = "./results/models"
//! omc_file = "OMC_Gradient Boosting_best.json"
//! mdd_file = "MDD_Gradient Boosting_best.json"
//!
//! [window]
//! width = 550.0
//! height = 650.0
//!
//! [theme]
//! background = "#e3f2fd"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::theme::Theme;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "OMC_MDD_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "omc_mdd.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub models: ModelPaths,
    pub window: WindowConfig,
    pub theme: ThemeConfig,
}

/// Where the two model artifacts live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    pub dir: PathBuf,
    pub omc_file: String,
    pub mdd_file: String,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./results/models"),
            omc_file: "OMC_Gradient Boosting_best.json".to_string(),
            mdd_file: "MDD_Gradient Boosting_best.json".to_string(),
        }
    }
}

impl ModelPaths {
    pub fn omc_path(&self) -> PathBuf {
        self.dir.join(&self.omc_file)
    }

    pub fn mdd_path(&self) -> PathBuf {
        self.dir.join(&self.mdd_file)
    }

    /// Same file names, different directory.
    pub fn with_dir(&self, dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    /// Window icon (PNG).
    pub icon: PathBuf,
    /// Banner shown above the form.
    pub banner: PathBuf,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 550.0,
            height: 650.0,
            icon: PathBuf::from("logo.png"),
            banner: PathBuf::from("presentation2.png"),
        }
    }
}

/// Hex colour strings, resolved into a [`Theme`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background: String,
    pub about_button: String,
    pub help_button: String,
    pub predict_button: String,
    pub copy_button: String,
    pub value: String,
    pub hint: String,
    pub error: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#e3f2fd".to_string(),
            about_button: "#42a5f5".to_string(),
            help_button: "#1e88e5".to_string(),
            predict_button: "#4caf50".to_string(),
            copy_button: "#ff9800".to_string(),
            value: "#0000ff".to_string(),
            hint: "#a0a0a0".to_string(),
            error: "#ff0000".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the configuration following the loading order above.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        log::info!("Loaded config from {CONFIG_ENV}={}", p.display());
                        return config;
                    }
                    Err(e) => {
                        log::warn!("Failed to load config from {CONFIG_ENV}, falling back: {e}");
                    }
                }
            } else {
                log::warn!("{CONFIG_ENV} points to non-existent file {path}, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    log::info!("Loaded config from ./{LOCAL_CONFIG}");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to load ./{LOCAL_CONFIG}, using defaults: {e}");
                }
            }
        }

        log::info!("No {LOCAL_CONFIG} found, using built-in defaults");
        Self::default()
    }

    /// Load and validate a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        // Colours are only strings until resolved; reject bad ones here.
        Theme::from_config(&config.theme)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_original_layout() {
        let config = AppConfig::default();
        assert_eq!(
            config.models.omc_path(),
            PathBuf::from("./results/models/OMC_Gradient Boosting_best.json")
        );
        assert_eq!(
            config.models.mdd_path(),
            PathBuf::from("./results/models/MDD_Gradient Boosting_best.json")
        );
        assert_eq!((config.window.width, config.window.height), (550.0, 650.0));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp");
        writeln!(file, "[models]\ndir = \"/opt/models\"\n\n[theme]\nbackground = \"#ffffff\"").unwrap();

        let config = AppConfig::load_from_file(file.path()).expect("valid config");
        assert_eq!(config.models.dir, PathBuf::from("/opt/models"));
        assert_eq!(config.models.omc_file, ModelPaths::default().omc_file);
        assert_eq!(config.theme.background, "#ffffff");
        assert_eq!(config.theme.copy_button, ThemeConfig::default().copy_button);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn bad_colour_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp");
        writeln!(file, "[theme]\naccent_is_unknown = 1\nerror = \"reddish\"").unwrap();

        let err = AppConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Colour { key: "error", .. }));
    }

    #[test]
    fn broken_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp");
        writeln!(file, "[models\ndir = ").unwrap();

        let err = AppConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn with_dir_keeps_file_names() {
        let paths = ModelPaths::default().with_dir("/tmp/m");
        assert_eq!(
            paths.mdd_path(),
            PathBuf::from("/tmp/m/MDD_Gradient Boosting_best.json")
        );
    }
}
