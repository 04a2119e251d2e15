//! Toolkit-wide settings.

use std::path::Path;
use std::time::Duration;

use horizon_skin_render::Color;
use serde::{Deserialize, Serialize};

use crate::error::{SkinError, SkinResult};

/// Settings shared by every window of a skin.
///
/// Loadable from TOML; missing keys take their defaults.
///
/// ```
/// use horizon_skin::skin::SkinConfig;
///
/// let config = SkinConfig::from_toml_str("update_interval_ms = 50\nsmoothing = 0.5").unwrap();
/// assert_eq!(config.update_interval().as_millis(), 50);
/// assert_eq!(config.track_timer_ms, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinConfig {
    /// Minimum time between forced window updates in milliseconds.
    /// Default: 30.
    pub update_interval_ms: u64,
    /// Interval of the track timer running while a control holds capture,
    /// in milliseconds. Default: 50.
    pub track_timer_ms: u64,
    /// Default delta filter coefficient of analog controls, in `[0, 0.99]`.
    /// Default: 0.
    pub smoothing: f32,
    /// Knob value change per pixel of vertical drag, as a fraction of the
    /// range. Default: 0.005.
    pub knob_sensitivity: f32,
    /// Value change per wheel notch or arrow key, as a fraction of the range.
    /// Default: 0.05.
    pub nudge_step: f32,
    /// Fill of synthesized placeholder images. Default: red.
    pub placeholder_color: Color,
    /// Focus frame color. Default: `#3C8CE6`.
    pub focus_color: Color,
    /// Whether the focus frame is drawn. Default: true.
    pub show_focus_frame: bool,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 30,
            track_timer_ms: 50,
            smoothing: 0.0,
            knob_sensitivity: 0.005,
            nudge_step: 0.05,
            placeholder_color: Color::RED,
            focus_color: Color::from_rgb8(0x3C, 0x8C, 0xE6),
            show_focus_frame: true,
        }
    }
}

impl SkinConfig {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(source: &str) -> SkinResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SkinResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SkinError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> SkinResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Minimum interval between forced updates.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// Track timer interval.
    pub fn track_timer_interval(&self) -> Duration {
        Duration::from_millis(self.track_timer_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_round_trip_through_toml() {
        let config = SkinConfig {
            focus_color: Color::from_rgba8(1, 2, 3, 128),
            ..SkinConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("#01020380"));
        assert_eq!(SkinConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let err = SkinConfig::from_toml_str("focus_color = \"blue\"").unwrap_err();
        assert!(matches!(err, SkinError::TomlParse(_)));
    }
}
