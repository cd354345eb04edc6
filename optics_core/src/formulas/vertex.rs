//! # Vertex-Distance Compensation
//!
//! A lens's effective power depends on where it sits in front of the eye.
//! Moving a lens changes the vergence reaching the cornea, so the power must
//! be compensated to keep the same focal point.
//!
//! ## Sign Convention
//!
//! The vertex *change* `d` is `new_vertex - original_vertex` in millimetres:
//! positive `d` means the lens moves **farther** from the eye.
//!
//! The effectivity factor is written in terms of the displacement toward the
//! eye, `s = -d / 1000` metres:
//!
//! ```text
//! factor = 1 / (1 - s·F)
//! F'     = F · factor = F / (1 - s·F)
//! ```
//!
//! Moving a minus lens closer makes it less minus; moving a plus lens closer
//! makes it more plus. The same factor, evaluated at the lens-to-eye
//! distance, is the power factor of spectacle magnification.
//!
//! ## Example
//!
//! ```rust
//! use optics_core::formulas::vertex::compensate_between;
//!
//! // -6.00 D worn at 12 mm, moved onto the cornea
//! let cl = compensate_between(-6.0, 12.0, 0.0).unwrap();
//! assert!((cl - (-5.597)).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::FormulaOutput;
use crate::errors::{require_finite, require_non_negative, OpticsError, OpticsResult};
use crate::units::{Meters, Millimeters, Unit};

/// Below this the effectivity denominator is treated as zero.
const DENOMINATOR_EPSILON: f64 = 1e-12;

/// Effectivity factor `1 / (1 - s·F)`.
///
/// `s` is a distance in metres measured toward the eye.
///
/// # Errors
///
/// `DomainUndefined` when `s·F = 1` (the lens would focus exactly at the new
/// position and the compensated power is infinite).
pub fn effectivity_factor(distance: Meters, power: f64) -> OpticsResult<f64> {
    require_finite("distance_m", distance.0)?;
    require_finite("power", power)?;

    let denominator = 1.0 - distance.0 * power;
    if denominator.abs() < DENOMINATOR_EPSILON {
        return Err(OpticsError::domain_undefined(
            "effectivity",
            format!(
                "{:.2} D at {:.1} mm has its focal point at the new position; compensated power is undefined",
                power,
                Millimeters::from(distance).0
            ),
        ));
    }
    Ok(1.0 / denominator)
}

/// Compensate a power for a vertex change of `vertex_change_mm`.
///
/// Positive change = lens moved farther from the eye.
pub fn compensate(power: f64, vertex_change_mm: f64) -> OpticsResult<f64> {
    require_finite("vertex_change_mm", vertex_change_mm)?;
    let toward_eye: Meters = Millimeters(-vertex_change_mm).into();
    Ok(power * effectivity_factor(toward_eye, power)?)
}

/// Compensate a power moved from one vertex distance to another.
pub fn compensate_between(power: f64, from_vertex_mm: f64, to_vertex_mm: f64) -> OpticsResult<f64> {
    require_non_negative("original_vertex_mm", from_vertex_mm)?;
    require_non_negative("new_vertex_mm", to_vertex_mm)?;
    compensate(power, to_vertex_mm - from_vertex_mm)
}

/// Vertex-distance problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexInput {
    /// Power at the original position (D)
    pub original_power: f64,
    /// Original back vertex distance (mm)
    pub original_vertex_mm: f64,
    /// New back vertex distance (mm)
    pub new_vertex_mm: f64,
}

/// Evaluate a vertex-distance input.
pub fn calculate(input: &VertexInput) -> OpticsResult<FormulaOutput> {
    let power = compensate_between(input.original_power, input.original_vertex_mm, input.new_vertex_mm)?;
    Ok(FormulaOutput::numeric(power, Unit::Diopters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_minus_lens_closer_needs_less_minus() {
        let f = compensate_between(-6.0, 12.0, 0.0).unwrap();
        assert!(approx_eq(f, -5.60, 0.05), "F' = {} (expected -5.60)", f);
        assert!(f > -6.0);
    }

    #[test]
    fn test_plus_lens_closer_needs_more_plus() {
        let f = compensate_between(8.0, 12.0, 0.0).unwrap();
        assert!(approx_eq(f, 8.85, 0.01), "F' = {} (expected 8.85)", f);
        assert!(f > 8.0);
    }

    #[test]
    fn test_moving_farther_reverses_direction() {
        // plus lens moved away needs less plus
        let f = compensate_between(12.0, 10.0, 15.0).unwrap();
        assert!(approx_eq(f, 11.32, 0.01), "F' = {}", f);
        // minus lens moved away needs more minus
        let f = compensate(-5.0, 5.0).unwrap();
        assert!(f < -5.0);
    }

    #[test]
    fn test_zero_change_is_identity() {
        assert_eq!(compensate(-4.25, 0.0).unwrap(), -4.25);
    }

    #[test]
    fn test_domain_undefined_when_denominator_vanishes() {
        // s·F = 1 with s = 0.1 m toward the eye and F = +10 D
        let err = compensate(10.0, -100.0).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_UNDEFINED");
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(compensate(f64::NAN, 2.0).unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(compensate_between(-3.0, -1.0, 0.0).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_effectivity_factor() {
        let factor = effectivity_factor(Meters(0.012), 10.0).unwrap();
        assert!(approx_eq(factor, 1.136, 0.001));
    }

    proptest! {
        #[test]
        fn prop_forward_then_back_returns_original(
            power in -20.0f64..20.0,
            change in -20.0f64..20.0,
        ) {
            let there = compensate(power, change).unwrap();
            let back = compensate(there, -change).unwrap();
            prop_assert!((back - power).abs() < 1e-6, "{} -> {} -> {}", power, there, back);
        }
    }
}
