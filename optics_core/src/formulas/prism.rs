//! # Prism and Prentice's Rule
//!
//! Looking through a lens anywhere other than its optical centre (OC)
//! produces prism. Prentice's Rule gives the amount:
//!
//! ```text
//! P = c · F        (c in centimetres, F in dioptres, P in prism dioptres Δ)
//! ```
//!
//! Opticians measure decentration in millimetres, so the functions here take
//! `c` in mm and convert.
//!
//! ## Base Direction
//!
//! The magnitude alone is not enough; the base direction is part of the
//! answer. With `shift` meaning the direction the OC sits relative to the
//! pupil:
//!
//! | Lens  | OC out | OC in | OC up | OC down |
//! |-------|--------|-------|-------|---------|
//! | plus  | BO     | BI    | BU    | BD      |
//! | minus | BI     | BO    | BD    | BU      |
//!
//! A plus lens is thickest at its centre, so the base points toward the OC;
//! a minus lens is thickest at its edge, so the base points away from it.
//!
//! ## Oblique Prism
//!
//! A base angle θ uses 360° notation as seen facing the patient. For the
//! right eye 0° points nasally (base in); for the left eye 0° points
//! temporally (base out). 90° is base up in both eyes.

use serde::{Deserialize, Serialize};

use crate::calculations::FormulaOutput;
use crate::errors::{require_finite, require_non_negative, OpticsError, OpticsResult};
use crate::units::{Centimeters, Millimeters, Unit};

/// Components smaller than this are reported as absent.
const NEGLIGIBLE_PRISM: f64 = 0.005;

/// Horizontal/vertical direction for both OC shifts and prism bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Nasal
    In,
    /// Temporal
    Out,
    Up,
    Down,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Prism base notation (`BI`, `BO`, `BU`, `BD`)
    pub fn base_notation(&self) -> &'static str {
        match self {
            Direction::In => "BI",
            Direction::Out => "BO",
            Direction::Up => "BU",
            Direction::Down => "BD",
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::In | Direction::Out)
    }
}

/// Which eye, needed to map an oblique base angle to in/out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Eye {
    #[serde(rename = "OD")]
    Right,
    #[serde(rename = "OS")]
    Left,
}

/// Prism induced by decentring a lens `decentration_mm` from the pupil.
///
/// Returns the magnitude in prism dioptres; see [`induced_base`] for the
/// direction.
///
/// ```rust
/// use optics_core::formulas::prism::prentice_prism;
///
/// // -4.00 D decentred 5 mm
/// assert!((prentice_prism(5.0, -4.0).unwrap() - 2.0).abs() < 1e-9);
/// ```
pub fn prentice_prism(decentration_mm: f64, power: f64) -> OpticsResult<f64> {
    require_finite("decentration_mm", decentration_mm)?;
    require_finite("power", power)?;
    let c: Centimeters = Millimeters(decentration_mm).into();
    Ok((c.0 * power).abs())
}

/// Decentration (mm) needed to induce `prism` prism dioptres.
///
/// # Errors
///
/// `DomainUndefined` for a plano lens, which cannot produce prism by
/// decentration.
pub fn required_decentration_mm(prism: f64, power: f64) -> OpticsResult<f64> {
    require_non_negative("prism", prism)?;
    require_finite("power", power)?;
    if power == 0.0 {
        return Err(OpticsError::domain_undefined(
            "Prentice's Rule",
            "a plano lens induces no prism at any decentration",
        ));
    }
    let c = Centimeters(prism / power.abs());
    Ok(Millimeters::from(c).0)
}

/// Base direction produced when the OC sits `oc_shift` of the pupil.
///
/// `None` for a plano lens.
pub fn induced_base(power: f64, oc_shift: Direction) -> Option<Direction> {
    if power > 0.0 {
        Some(oc_shift)
    } else if power < 0.0 {
        Some(oc_shift.opposite())
    } else {
        None
    }
}

/// Which way to move the OC to get a prism base of `base`.
///
/// Inverse of [`induced_base`]; `None` for a plano lens.
pub fn decentration_for_base(power: f64, base: Direction) -> Option<Direction> {
    // the table is its own inverse
    induced_base(power, base)
}

/// Format a prism amount as `"2.00 BI"`.
pub fn format_prism(magnitude: f64, base: Direction) -> String {
    format!("{:.2} {}", magnitude, base.base_notation())
}

/// Horizontal and vertical components of an oblique prism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObliquePrism {
    /// Horizontal magnitude (Δ)
    pub horizontal: f64,
    /// `In`/`Out`, or `None` when negligible
    pub horizontal_base: Option<Direction>,
    /// Vertical magnitude (Δ)
    pub vertical: f64,
    /// `Up`/`Down`, or `None` when negligible
    pub vertical_base: Option<Direction>,
}

impl ObliquePrism {
    /// `"2.60 BI 1.50 BU"`, omitting negligible components.
    pub fn notation(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(base) = self.horizontal_base {
            parts.push(format_prism(self.horizontal, base));
        }
        if let Some(base) = self.vertical_base {
            parts.push(format_prism(self.vertical, base));
        }
        if parts.is_empty() {
            "0.00".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Resolve an oblique prism into horizontal and vertical components.
pub fn resolve_oblique(magnitude: f64, base_angle_deg: f64, eye: Eye) -> OpticsResult<ObliquePrism> {
    require_non_negative("magnitude", magnitude)?;
    require_finite("base_angle_deg", base_angle_deg)?;

    let theta = base_angle_deg.rem_euclid(360.0).to_radians();
    let h = magnitude * theta.cos();
    let v = magnitude * theta.sin();

    let horizontal_base = if h.abs() < NEGLIGIBLE_PRISM {
        None
    } else {
        let toward_zero_degrees = match eye {
            Eye::Right => Direction::In,
            Eye::Left => Direction::Out,
        };
        Some(if h > 0.0 { toward_zero_degrees } else { toward_zero_degrees.opposite() })
    };
    let vertical_base = if v.abs() < NEGLIGIBLE_PRISM {
        None
    } else if v > 0.0 {
        Some(Direction::Up)
    } else {
        Some(Direction::Down)
    };

    Ok(ObliquePrism {
        horizontal: if horizontal_base.is_some() { h.abs() } else { 0.0 },
        horizontal_base,
        vertical: if vertical_base.is_some() { v.abs() } else { 0.0 },
        vertical_base,
    })
}

/// Combine horizontal and vertical components into `(magnitude, base_angle_deg)`.
///
/// Inverse of [`resolve_oblique`]. The angle is in `[0, 360)`.
pub fn combine_components(prism: &ObliquePrism, eye: Eye) -> OpticsResult<(f64, f64)> {
    require_non_negative("horizontal", prism.horizontal)?;
    require_non_negative("vertical", prism.vertical)?;

    let x = match (prism.horizontal_base, eye) {
        (None, _) => 0.0,
        (Some(Direction::In), Eye::Right) | (Some(Direction::Out), Eye::Left) => prism.horizontal,
        (Some(Direction::Out), Eye::Right) | (Some(Direction::In), Eye::Left) => -prism.horizontal,
        (Some(other), _) => {
            return Err(OpticsError::invalid_input(
                "horizontal_base",
                other.base_notation(),
                "Horizontal base must be in or out",
            ))
        }
    };
    let y = match prism.vertical_base {
        None => 0.0,
        Some(Direction::Up) => prism.vertical,
        Some(Direction::Down) => -prism.vertical,
        Some(other) => {
            return Err(OpticsError::invalid_input(
                "vertical_base",
                other.base_notation(),
                "Vertical base must be up or down",
            ))
        }
    };

    let magnitude = x.hypot(y);
    let angle = y.atan2(x).to_degrees().rem_euclid(360.0);
    Ok((magnitude, angle))
}

/// Prism problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PrismInput {
    /// Magnitude only (Δ)
    Prentice { decentration_mm: f64, power: f64 },
    /// Magnitude and base, answered as `"1.80 BI"`
    PrenticeWithBase {
        decentration_mm: f64,
        power: f64,
        oc_shift: Direction,
    },
    /// Solve Prentice's Rule for decentration (mm)
    RequiredDecentration { prism: f64, power: f64 },
    /// Split an oblique prism into components, answered as `"2.60 BI 1.50 BU"`
    Oblique {
        magnitude: f64,
        base_angle_deg: f64,
        eye: Eye,
    },
}

/// Evaluate a prism input.
pub fn calculate(input: &PrismInput) -> OpticsResult<FormulaOutput> {
    match *input {
        PrismInput::Prentice { decentration_mm, power } => {
            let p = prentice_prism(decentration_mm, power)?;
            Ok(FormulaOutput::numeric(p, Unit::PrismDiopters))
        }
        PrismInput::PrenticeWithBase {
            decentration_mm,
            power,
            oc_shift,
        } => {
            let p = prentice_prism(decentration_mm, power)?;
            let base = induced_base(power, oc_shift).ok_or_else(|| {
                OpticsError::domain_undefined("Prentice's Rule", "a plano lens has no prism base")
            })?;
            Ok(FormulaOutput::text(format_prism(p, base)))
        }
        PrismInput::RequiredDecentration { prism, power } => {
            let c = required_decentration_mm(prism, power)?;
            Ok(FormulaOutput::numeric(c, Unit::Millimeters))
        }
        PrismInput::Oblique {
            magnitude,
            base_angle_deg,
            eye,
        } => {
            let resolved = resolve_oblique(magnitude, base_angle_deg, eye)?;
            Ok(FormulaOutput::text(resolved.notation()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_prentice_basic() {
        assert!((prentice_prism(5.0, -4.0).unwrap() - 2.0).abs() < EPSILON);
        assert!((prentice_prism(4.0, 3.0).unwrap() - 1.2).abs() < EPSILON);
        assert_eq!(prentice_prism(0.0, 8.0).unwrap(), 0.0);
    }

    #[test]
    fn test_required_decentration() {
        let c = required_decentration_mm(2.0, 5.0).unwrap();
        assert!((c - 4.0).abs() < EPSILON, "c = {}", c);
        let c = required_decentration_mm(2.0, -5.0).unwrap();
        assert!((c - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_plano_lens_cannot_make_prism() {
        let err = required_decentration_mm(1.0, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_UNDEFINED");
        assert_eq!(induced_base(0.0, Direction::In), None);

        let err = calculate(&PrismInput::PrenticeWithBase {
            decentration_mm: 3.0,
            power: 0.0,
            oc_shift: Direction::Out,
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_UNDEFINED");
    }

    #[test]
    fn test_base_direction_table() {
        // minus lens: OC out -> base in, OC in -> base out
        assert_eq!(induced_base(-4.0, Direction::Out), Some(Direction::In));
        assert_eq!(induced_base(-4.0, Direction::In), Some(Direction::Out));
        // plus lens reversed
        assert_eq!(induced_base(4.0, Direction::Out), Some(Direction::Out));
        assert_eq!(induced_base(4.0, Direction::In), Some(Direction::In));
        // pupil below OC (OC up): plus -> base up, minus -> base down
        assert_eq!(induced_base(2.5, Direction::Up), Some(Direction::Up));
        assert_eq!(induced_base(-2.5, Direction::Up), Some(Direction::Down));
    }

    #[test]
    fn test_decentration_for_base_inverts_table() {
        for power in [-3.0, 3.0] {
            for base in [Direction::In, Direction::Out, Direction::Up, Direction::Down] {
                let shift = decentration_for_base(power, base).unwrap();
                assert_eq!(induced_base(power, shift), Some(base));
            }
        }
    }

    #[test]
    fn test_prentice_with_base_output() {
        let out = calculate(&PrismInput::PrenticeWithBase {
            decentration_mm: 3.0,
            power: -6.0,
            oc_shift: Direction::Out,
        })
        .unwrap();
        assert_eq!(out, FormulaOutput::text("1.80 BI"));
    }

    #[test]
    fn test_oblique_right_eye() {
        let p = resolve_oblique(3.0, 30.0, Eye::Right).unwrap();
        assert!((p.horizontal - 2.598).abs() < 0.001);
        assert_eq!(p.horizontal_base, Some(Direction::In));
        assert!((p.vertical - 1.5).abs() < 0.001);
        assert_eq!(p.vertical_base, Some(Direction::Up));
        assert_eq!(p.notation(), "2.60 BI 1.50 BU");
    }

    #[test]
    fn test_oblique_left_eye_mirrors_horizontal() {
        let p = resolve_oblique(3.0, 30.0, Eye::Left).unwrap();
        assert_eq!(p.horizontal_base, Some(Direction::Out));
        let p = resolve_oblique(2.0, 225.0, Eye::Left).unwrap();
        assert_eq!(p.horizontal_base, Some(Direction::In));
        assert_eq!(p.vertical_base, Some(Direction::Down));
    }

    #[test]
    fn test_oblique_pure_vertical_drops_horizontal() {
        let p = resolve_oblique(2.0, 90.0, Eye::Right).unwrap();
        assert_eq!(p.horizontal_base, None);
        assert_eq!(p.horizontal, 0.0);
        assert_eq!(p.notation(), "2.00 BU");
    }

    #[test]
    fn test_combine_inverts_resolve() {
        for (eye, angle) in [(Eye::Right, 30.0), (Eye::Left, 150.0), (Eye::Right, 300.0)] {
            let p = resolve_oblique(4.0, angle, eye).unwrap();
            let (magnitude, back) = combine_components(&p, eye).unwrap();
            assert!((magnitude - 4.0).abs() < 1e-9);
            assert!((back - angle).abs() < 1e-9, "{} vs {}", back, angle);
        }
    }

    #[test]
    fn test_combine_rejects_misplaced_base() {
        let p = ObliquePrism {
            horizontal: 1.0,
            horizontal_base: Some(Direction::Up),
            vertical: 0.0,
            vertical_base: None,
        };
        assert!(combine_components(&p, Eye::Right).is_err());
    }

    proptest! {
        #[test]
        fn prop_prentice_is_linear(c in 0.0f64..20.0, power in -20.0f64..20.0) {
            let base = prentice_prism(c, power).unwrap();
            let double_c = prentice_prism(2.0 * c, power).unwrap();
            let double_f = prentice_prism(c, 2.0 * power).unwrap();
            prop_assert!((double_c - 2.0 * base).abs() < 1e-9);
            prop_assert!((double_f - 2.0 * base).abs() < 1e-9);
        }
    }
}
