//! Editor configuration.

use crate::error::ConfigError;
use crate::units::{PaperSize, find_preset};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables shared by the canvas, the resize overlay and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Preset id used for new documents.
    pub default_preset: String,
    /// Smallest width or height a table track can be dragged to, in px.
    pub min_track_size: f64,
    /// Thickness of each ruler band when rulers are shown, in UI px.
    pub ruler_thickness: f64,
    /// Number of undo snapshots kept per document.
    pub undo_depth: usize,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_preset: "a4".to_string(),
            min_track_size: 10.0,
            ruler_thickness: 20.0,
            undo_depth: 50,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn with_default_preset(mut self, preset: impl Into<String>) -> Self {
        self.default_preset = preset.into();
        self
    }

    pub fn with_min_track_size(mut self, min: f64) -> Self {
        self.min_track_size = min;
        self
    }

    pub fn with_ruler_thickness(mut self, thickness: f64) -> Self {
        self.ruler_thickness = thickness;
        self
    }

    pub fn with_undo_depth(mut self, depth: usize) -> Self {
        self.undo_depth = depth;
        self
    }

    pub fn with_zoom_limits(mut self, min: f64, max: f64) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    /// Paper size for new documents; unknown presets fall back to A4.
    pub fn default_paper(&self) -> PaperSize {
        match find_preset(&self.default_preset) {
            Some(preset) => preset.size,
            None => {
                log::warn!("unknown default preset {:?}, using A4", self.default_preset);
                PaperSize::default()
            }
        }
    }

    /// Minimum track size, guarded against unusable values.
    pub fn track_floor(&self) -> f64 {
        if self.min_track_size.is_finite() && self.min_track_size >= 0.0 {
            self.min_track_size
        } else {
            Self::default().min_track_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PlannerConfig::from_json(r#"{"minTrackSize": 24}"#).unwrap();
        assert!((config.min_track_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(config.undo_depth, 50);
        assert_eq!(config.default_preset, "a4");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"defaultPreset": "letter", "rulerThickness": 16}}"#).unwrap();
        let config = PlannerConfig::load(file.path()).unwrap();
        assert_eq!(config.default_preset, "letter");
        assert!((config.default_paper().width_mm - 215.9).abs() < 0.1);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = PlannerConfig::default()
            .with_default_preset("napkin")
            .with_min_track_size(f64::NAN);
        assert_eq!(config.default_paper(), PaperSize::default());
        assert!((config.track_floor() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(PlannerConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
