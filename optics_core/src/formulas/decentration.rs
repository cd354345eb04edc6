//! # Decentration and Minimum Blank Size
//!
//! Frames are built around their own geometric centres; patients' pupils are
//! rarely that far apart. Each lens's optical centre is moved ("decentred")
//! to sit in front of the pupil.
//!
//! ## Formulas
//!
//! ```text
//! frame PD              = A + DBL
//! per-lens decentration = (frame PD - patient PD) / 2     (binocular PD)
//!                       = frame PD / 2 - monocular PD     (monocular PD)
//! MBS                   = ED + 2·|decentration| + safety margin
//! ```
//!
//! A positive decentration moves the OC **inward** (nasally). The safety
//! margin defaults to 2 mm and comes from [`OpticsSettings`].
//!
//! Rounding MBS up to a blank the lab actually stocks is a separate lookup
//! through [`BlankCatalog`], so a lab can plug in its own size list.
//!
//! [`OpticsSettings`]: crate::settings::OpticsSettings

use serde::{Deserialize, Serialize};

use crate::calculations::FormulaOutput;
use crate::errors::{require_non_negative, require_positive, OpticsResult};
use crate::formulas::prism::Direction;
use crate::settings::OpticsSettings;
use crate::units::Unit;

/// How the frame's centre distance was measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrameMeasurement {
    /// Frame PD given directly
    Pd { frame_pd_mm: f64 },
    /// Boxing system: eye size A and bridge DBL
    Boxing { a_mm: f64, dbl_mm: f64 },
}

impl FrameMeasurement {
    /// Distance between the frame's boxed centres (mm)
    pub fn frame_pd(&self) -> OpticsResult<f64> {
        match *self {
            FrameMeasurement::Pd { frame_pd_mm } => require_positive("frame_pd_mm", frame_pd_mm),
            FrameMeasurement::Boxing { a_mm, dbl_mm } => frame_pd(a_mm, dbl_mm),
        }
    }
}

/// Frame PD from the boxing measurements: `A + DBL`.
pub fn frame_pd(a_mm: f64, dbl_mm: f64) -> OpticsResult<f64> {
    require_positive("a_mm", a_mm)?;
    require_non_negative("dbl_mm", dbl_mm)?;
    Ok(a_mm + dbl_mm)
}

/// Per-lens decentration from a binocular PD. Positive = inward.
///
/// ```rust
/// use optics_core::formulas::decentration::per_lens_decentration;
///
/// assert_eq!(per_lens_decentration(70.0, 64.0).unwrap(), 3.0);
/// ```
pub fn per_lens_decentration(frame_pd_mm: f64, patient_pd_mm: f64) -> OpticsResult<f64> {
    require_positive("frame_pd_mm", frame_pd_mm)?;
    require_positive("patient_pd_mm", patient_pd_mm)?;
    Ok((frame_pd_mm - patient_pd_mm) / 2.0)
}

/// Decentration for one eye from its monocular PD. Positive = inward.
pub fn monocular_decentration(frame_pd_mm: f64, monocular_pd_mm: f64) -> OpticsResult<f64> {
    require_positive("frame_pd_mm", frame_pd_mm)?;
    require_positive("monocular_pd_mm", monocular_pd_mm)?;
    Ok(frame_pd_mm / 2.0 - monocular_pd_mm)
}

/// Direction the OC moves for a signed decentration; `None` when centred.
pub fn decentration_direction(decentration_mm: f64) -> Option<Direction> {
    if decentration_mm > 0.0 {
        Some(Direction::In)
    } else if decentration_mm < 0.0 {
        Some(Direction::Out)
    } else {
        None
    }
}

/// Minimum blank size (mm) before rounding to a stocked blank.
pub fn minimum_blank_size(effective_diameter_mm: f64, decentration_mm: f64, safety_margin_mm: f64) -> OpticsResult<f64> {
    require_positive("effective_diameter_mm", effective_diameter_mm)?;
    require_non_negative("safety_margin_mm", safety_margin_mm)?;
    Ok(effective_diameter_mm + 2.0 * decentration_mm.abs() + safety_margin_mm)
}

/// Lookup of manufactured blank diameters.
pub trait BlankCatalog {
    /// Smallest stocked blank at least `mbs_mm` across, if any.
    fn next_available(&self, mbs_mm: f64) -> Option<f64>;
}

/// A fixed list of blank diameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardBlanks {
    pub sizes_mm: Vec<f64>,
}

impl StandardBlanks {
    pub fn new(mut sizes_mm: Vec<f64>) -> Self {
        sizes_mm.retain(|s| s.is_finite());
        sizes_mm.sort_by(f64::total_cmp);
        Self { sizes_mm }
    }
}

impl Default for StandardBlanks {
    fn default() -> Self {
        Self::new(OpticsSettings::default().blank_sizes_mm)
    }
}

impl BlankCatalog for StandardBlanks {
    fn next_available(&self, mbs_mm: f64) -> Option<f64> {
        self.sizes_mm.iter().copied().find(|size| *size >= mbs_mm)
    }
}

/// Decentration problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DecentrationInput {
    /// Per-lens decentration from a binocular PD (mm, + = in)
    PerLens {
        frame: FrameMeasurement,
        patient_pd_mm: f64,
    },
    /// Decentration for one eye from a monocular PD (mm, + = in)
    Monocular {
        frame: FrameMeasurement,
        monocular_pd_mm: f64,
    },
    /// Minimum blank size (mm)
    MinimumBlankSize {
        frame: FrameMeasurement,
        patient_pd_mm: f64,
        effective_diameter_mm: f64,
    },
}

/// Evaluate a decentration input.
pub fn calculate(input: &DecentrationInput, settings: &OpticsSettings) -> OpticsResult<FormulaOutput> {
    let value = match *input {
        DecentrationInput::PerLens { frame, patient_pd_mm } => per_lens_decentration(frame.frame_pd()?, patient_pd_mm)?,
        DecentrationInput::Monocular { frame, monocular_pd_mm } => {
            monocular_decentration(frame.frame_pd()?, monocular_pd_mm)?
        }
        DecentrationInput::MinimumBlankSize {
            frame,
            patient_pd_mm,
            effective_diameter_mm,
        } => {
            let dec = per_lens_decentration(frame.frame_pd()?, patient_pd_mm)?;
            minimum_blank_size(effective_diameter_mm, dec, settings.blank_safety_margin_mm)?
        }
    };
    Ok(FormulaOutput::numeric(value, Unit::Millimeters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_pd_from_boxing() {
        assert_eq!(frame_pd(52.0, 18.0).unwrap(), 70.0);
        assert!(frame_pd(0.0, 18.0).is_err());
    }

    #[test]
    fn test_inward_decentration() {
        let d = per_lens_decentration(70.0, 64.0).unwrap();
        assert_eq!(d, 3.0);
        assert_eq!(decentration_direction(d), Some(Direction::In));
    }

    #[test]
    fn test_outward_decentration() {
        let d = per_lens_decentration(64.0, 68.0).unwrap();
        assert_eq!(d, -2.0);
        assert_eq!(decentration_direction(d), Some(Direction::Out));
        assert_eq!(decentration_direction(0.0), None);
    }

    #[test]
    fn test_monocular() {
        assert_eq!(monocular_decentration(68.0, 31.5).unwrap(), 2.5);
    }

    #[test]
    fn test_minimum_blank_size() {
        // A 54, DBL 16, PD 64, ED 58 -> 58 + 2·3 + 2 = 66
        let dec = per_lens_decentration(frame_pd(54.0, 16.0).unwrap(), 64.0).unwrap();
        assert_eq!(minimum_blank_size(58.0, dec, 2.0).unwrap(), 66.0);
        // outward decentration still enlarges the blank
        assert_eq!(minimum_blank_size(52.0, -2.0, 2.0).unwrap(), 58.0);
    }

    #[test]
    fn test_blank_catalog_rounds_up() {
        let catalog = StandardBlanks::default();
        assert_eq!(catalog.next_available(66.0), Some(70.0));
        assert_eq!(catalog.next_available(65.0), Some(65.0));
        assert_eq!(catalog.next_available(81.0), None);

        let custom = StandardBlanks::new(vec![72.0, 58.0, 65.0]);
        assert_eq!(custom.next_available(60.0), Some(65.0));
    }

    #[test]
    fn test_calculate_uses_settings_margin() {
        let input = DecentrationInput::MinimumBlankSize {
            frame: FrameMeasurement::Boxing { a_mm: 54.0, dbl_mm: 16.0 },
            patient_pd_mm: 64.0,
            effective_diameter_mm: 58.0,
        };
        let defaults = calculate(&input, &OpticsSettings::default()).unwrap();
        assert_eq!(defaults, FormulaOutput::numeric(66.0, Unit::Millimeters));

        let settings = OpticsSettings {
            blank_safety_margin_mm: 3.0,
            ..OpticsSettings::default()
        };
        let wider = calculate(&input, &settings).unwrap();
        assert_eq!(wider, FormulaOutput::numeric(67.0, Unit::Millimeters));
    }

    #[test]
    fn test_invalid_pd() {
        assert_eq!(per_lens_decentration(70.0, -64.0).unwrap_err().error_code(), "INVALID_INPUT");
        assert!(per_lens_decentration(f64::NAN, 64.0).is_err());
    }
}
