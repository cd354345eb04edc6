//! # Dispensing Settings
//!
//! Lab- and practice-specific constants used by a few formulas. Everything
//! has a conventional default; the problem bank is written against those
//! defaults.
//!
//! Settings can be loaded from TOML. Missing keys fall back to defaults:
//!
//! ```toml
//! blank_safety_margin_mm = 2.0
//! blank_sizes_mm = [50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0]
//! base_curve_step_d = 0.5
//! contact_lens_step_d = 0.25
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{require_non_negative, require_positive, OpticsError, OpticsResult};

/// Dispensing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticsSettings {
    /// Added to ED + 2·decentration for minimum blank size (mm)
    pub blank_safety_margin_mm: f64,
    /// Stocked uncut blank diameters (mm)
    pub blank_sizes_mm: Vec<f64>,
    /// Spacing of the manufactured base-curve series (D)
    pub base_curve_step_d: f64,
    /// Flattest manufactured base curve (D)
    pub base_curve_min_d: f64,
    /// Steepest manufactured base curve (D)
    pub base_curve_max_d: f64,
    /// Contact-lens power step (D)
    pub contact_lens_step_d: f64,
    /// Vertex distance assumed when none is measured (mm)
    pub default_vertex_mm: f64,
}

impl Default for OpticsSettings {
    fn default() -> Self {
        Self {
            blank_safety_margin_mm: 2.0,
            blank_sizes_mm: vec![50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0],
            base_curve_step_d: 0.5,
            base_curve_min_d: 0.5,
            base_curve_max_d: 10.5,
            contact_lens_step_d: 0.25,
            default_vertex_mm: 12.0,
        }
    }
}

impl OpticsSettings {
    /// Parse settings from a TOML string.
    pub fn from_toml_str(s: &str) -> OpticsResult<Self> {
        let settings: OpticsSettings = toml::from_str(s).map_err(|e| OpticsError::SerializationError {
            reason: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every constant is usable.
    pub fn validate(&self) -> OpticsResult<()> {
        require_non_negative("blank_safety_margin_mm", self.blank_safety_margin_mm)?;
        for size in &self.blank_sizes_mm {
            require_positive("blank_sizes_mm", *size)?;
        }
        require_positive("base_curve_step_d", self.base_curve_step_d)?;
        require_non_negative("base_curve_min_d", self.base_curve_min_d)?;
        require_positive("base_curve_max_d", self.base_curve_max_d)?;
        if self.base_curve_max_d < self.base_curve_min_d {
            return Err(OpticsError::invalid_input(
                "base_curve_max_d",
                self.base_curve_max_d.to_string(),
                "Steepest base curve must not be flatter than the flattest",
            ));
        }
        require_positive("contact_lens_step_d", self.contact_lens_step_d)?;
        require_non_negative("default_vertex_mm", self.default_vertex_mm)?;
        Ok(())
    }
}

/// Load settings from a TOML file.
pub fn load_settings(path: impl AsRef<Path>) -> OpticsResult<OpticsSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| OpticsError::file_error("read", path.display().to_string(), e.to_string()))?;
    let settings = OpticsSettings::from_toml_str(&contents)?;
    info!(path = %path.display(), "loaded optics settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(OpticsSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = OpticsSettings::from_toml_str("blank_safety_margin_mm = 3.0\n").unwrap();
        assert_eq!(settings.blank_safety_margin_mm, 3.0);
        assert_eq!(settings.contact_lens_step_d, 0.25);
        assert_eq!(settings.blank_sizes_mm.len(), 7);
    }

    #[test]
    fn test_invalid_toml() {
        let err = OpticsSettings::from_toml_str("blank_safety_margin_mm = \"wide\"").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let err = OpticsSettings::from_toml_str("contact_lens_step_d = 0.0").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = OpticsSettings::from_toml_str("base_curve_min_d = 4.0\nbase_curve_max_d = 2.0").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_settings("/nonexistent/optics.toml").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("optics_settings_{}.toml", std::process::id()));
        std::fs::write(&path, "blank_sizes_mm = [60.0, 70.0]\n").unwrap();
        let settings = load_settings(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(settings.blank_sizes_mm, vec![60.0, 70.0]);
    }
}
