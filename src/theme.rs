use eframe::egui::Color32;
use palette::Srgb;

use crate::config::ThemeConfig;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Hex parsing
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`) into an egui colour.
pub fn parse_hex(hex: &str) -> Result<Color32, String> {
    let rgb: Srgb<u8> = hex.trim().parse().map_err(|e| format!("{e}"))?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// Theme – resolved colours
// ---------------------------------------------------------------------------

/// Colours used by the panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color32,
    pub about_button: Color32,
    pub help_button: Color32,
    pub predict_button: Color32,
    pub copy_button: Color32,
    /// Derived values and results.
    pub value: Color32,
    /// Field descriptions and footer.
    pub hint: Color32,
    pub error: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(0xe3, 0xf2, 0xfd),
            about_button: Color32::from_rgb(0x42, 0xa5, 0xf5),
            help_button: Color32::from_rgb(0x1e, 0x88, 0xe5),
            predict_button: Color32::from_rgb(0x4c, 0xaf, 0x50),
            copy_button: Color32::from_rgb(0xff, 0x98, 0x00),
            value: Color32::BLUE,
            hint: Color32::GRAY,
            error: Color32::RED,
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Result<Self, ConfigError> {
        let resolve = |key: &'static str, value: &str| {
            parse_hex(value).map_err(|reason| ConfigError::Colour {
                key,
                value: value.to_string(),
                reason,
            })
        };
        Ok(Self {
            background: resolve("background", &config.background)?,
            about_button: resolve("about_button", &config.about_button)?,
            help_button: resolve("help_button", &config.help_button)?,
            predict_button: resolve("predict_button", &config.predict_button)?,
            copy_button: resolve("copy_button", &config.copy_button)?,
            value: resolve("value", &config.value)?,
            hint: resolve("hint", &config.hint)?,
            error: resolve("error", &config.error)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex("#e3f2fd"), Ok(Color32::from_rgb(0xe3, 0xf2, 0xfd)));
        assert_eq!(parse_hex("4caf50"), Ok(Color32::from_rgb(0x4c, 0xaf, 0x50)));
        assert!(parse_hex("#12").is_err());
        assert!(parse_hex("blue").is_err());
    }

    #[test]
    fn default_config_resolves_to_default_theme() {
        let theme = Theme::from_config(&ThemeConfig::default()).unwrap();
        assert_eq!(theme, Theme::default());
    }
}
