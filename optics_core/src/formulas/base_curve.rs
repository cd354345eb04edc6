//! # Base-Curve Selection (Vogel's Rule)
//!
//! ```text
//! base curve = S/2 + 6
//! ```
//!
//! Vogel's Rule is a starting point, not optics. The raw value is then
//! snapped to a curve the lab actually makes, and a dispenser will often
//! deviate from it for frame wrap or to match the curve a patient is
//! already adapted to. The snapping step is the [`BaseCurveSeries`] trait so
//! either choice can be swapped in.
//!
//! ## Example
//!
//! ```rust
//! use optics_core::formulas::base_curve::{vogel_base_curve, BaseCurveSeries, StepSeries};
//!
//! let raw = vogel_base_curve(-4.75).unwrap();
//! assert_eq!(raw, 3.625);
//! assert_eq!(StepSeries::default().nearest(raw).unwrap(), 3.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::FormulaOutput;
use crate::errors::{require_finite, require_positive, OpticsError, OpticsResult};
use crate::settings::OpticsSettings;
use crate::units::Unit;

/// Raw base curve from Vogel's Rule (D).
pub fn vogel_base_curve(sphere_power: f64) -> OpticsResult<f64> {
    require_finite("sphere_power", sphere_power)?;
    Ok(sphere_power / 2.0 + 6.0)
}

/// The set of base curves a lab can supply.
pub trait BaseCurveSeries {
    /// Closest manufactured base curve to `raw`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `raw` is not finite or the series itself is unusable.
    fn nearest(&self, raw: f64) -> OpticsResult<f64>;
}

/// Evenly spaced base curves between `min_d` and `max_d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSeries {
    pub step_d: f64,
    pub min_d: f64,
    pub max_d: f64,
}

impl StepSeries {
    pub fn from_settings(settings: &OpticsSettings) -> Self {
        Self {
            step_d: settings.base_curve_step_d,
            min_d: settings.base_curve_min_d,
            max_d: settings.base_curve_max_d,
        }
    }

    /// Positive step, finite bounds, `min_d <= max_d`.
    pub fn validate(&self) -> OpticsResult<()> {
        require_positive("base_curve_step_d", self.step_d)?;
        require_finite("base_curve_min_d", self.min_d)?;
        require_finite("base_curve_max_d", self.max_d)?;
        if self.min_d > self.max_d {
            return Err(OpticsError::invalid_input(
                "base_curve_max_d",
                self.max_d.to_string(),
                "Steepest base curve must not be flatter than the flattest",
            ));
        }
        Ok(())
    }
}

impl Default for StepSeries {
    fn default() -> Self {
        Self::from_settings(&OpticsSettings::default())
    }
}

impl BaseCurveSeries for StepSeries {
    /// Rounds half up, then clamps into the series range.
    fn nearest(&self, raw: f64) -> OpticsResult<f64> {
        self.validate()?;
        require_finite("raw_base_curve", raw)?;
        let steps = ((raw - self.min_d) / self.step_d + 0.5).floor();
        Ok((self.min_d + steps * self.step_d).clamp(self.min_d, self.max_d))
    }
}

/// Base-curve problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseCurveInput {
    /// Sphere power of the prescription (D)
    pub sphere_power: f64,
    /// Snap the raw value to the manufactured series
    #[serde(default)]
    pub round_to_series: bool,
}

/// Evaluate a base-curve input.
pub fn calculate(input: &BaseCurveInput, settings: &OpticsSettings) -> OpticsResult<FormulaOutput> {
    let raw = vogel_base_curve(input.sphere_power)?;
    let value = if input.round_to_series {
        StepSeries::from_settings(settings).nearest(raw)?
    } else {
        raw
    };
    Ok(FormulaOutput::numeric(value, Unit::Diopters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vogel_rule() {
        assert_eq!(vogel_base_curve(-3.0).unwrap(), 4.5);
        assert_eq!(vogel_base_curve(2.0).unwrap(), 7.0);
        assert_eq!(vogel_base_curve(-6.0).unwrap(), 3.0);
        assert!(vogel_base_curve(f64::NAN).is_err());
    }

    #[test]
    fn test_series_rounding() {
        let series = StepSeries::default();
        assert_eq!(series.nearest(3.625).unwrap(), 3.5);
        assert_eq!(series.nearest(3.75).unwrap(), 4.0);
        assert_eq!(series.nearest(4.5).unwrap(), 4.5);
        // clamped at both ends
        assert_eq!(series.nearest(-1.0).unwrap(), 0.5);
        assert_eq!(series.nearest(14.0).unwrap(), 10.5);
    }

    #[test]
    fn test_custom_series() {
        let whole = StepSeries {
            step_d: 2.0,
            min_d: 2.0,
            max_d: 10.0,
        };
        assert_eq!(whole.nearest(4.5).unwrap(), 4.0);
        assert_eq!(whole.nearest(5.0).unwrap(), 6.0);
    }

    #[test]
    fn test_calculate_with_rounding() {
        let settings = OpticsSettings::default();
        let raw = calculate(
            &BaseCurveInput {
                sphere_power: -4.75,
                round_to_series: false,
            },
            &settings,
        )
        .unwrap();
        assert_eq!(raw, FormulaOutput::numeric(3.625, Unit::Diopters));

        let rounded = calculate(
            &BaseCurveInput {
                sphere_power: -4.75,
                round_to_series: true,
            },
            &settings,
        )
        .unwrap();
        assert_eq!(rounded, FormulaOutput::numeric(3.5, Unit::Diopters));
    }

    #[test]
    fn test_invalid_series_is_rejected() {
        let flat = StepSeries {
            step_d: 0.0,
            min_d: 0.5,
            max_d: 10.5,
        };
        assert_eq!(flat.nearest(4.0).unwrap_err().error_code(), "INVALID_INPUT");

        let inverted = StepSeries {
            step_d: 0.5,
            min_d: 6.0,
            max_d: 2.0,
        };
        assert_eq!(inverted.nearest(4.0).unwrap_err().error_code(), "INVALID_INPUT");

        let unbounded = StepSeries {
            step_d: 0.5,
            min_d: 0.5,
            max_d: f64::INFINITY,
        };
        assert!(unbounded.nearest(4.0).is_err());
        assert!(StepSeries::default().nearest(f64::NAN).is_err());
    }

    #[test]
    fn test_unvalidated_settings_error_instead_of_panicking() {
        let input = BaseCurveInput {
            sphere_power: -3.0,
            round_to_series: true,
        };
        let inverted = OpticsSettings {
            base_curve_min_d: 6.0,
            base_curve_max_d: 2.0,
            ..OpticsSettings::default()
        };
        assert_eq!(calculate(&input, &inverted).unwrap_err().error_code(), "INVALID_INPUT");

        let zero_step = OpticsSettings {
            base_curve_step_d: 0.0,
            ..OpticsSettings::default()
        };
        assert_eq!(calculate(&input, &zero_step).unwrap_err().error_code(), "INVALID_INPUT");
    }
}
