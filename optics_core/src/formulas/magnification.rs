//! # Spectacle Magnification
//!
//! ```text
//! SM_power = 1 / (1 - h·F)          h = lens-to-eye distance (m)
//! SM_shape = 1 / (1 - (t/n)·F₁)     t = centre thickness (m), F₁ = front surface power
//! SM       = SM_shape · SM_power
//! ```
//!
//! The power factor is the same effectivity factor used for vertex
//! compensation and is computed by [`effectivity_factor`].

use serde::{Deserialize, Serialize};

use crate::calculations::FormulaOutput;
use crate::errors::{require_finite, require_non_negative, OpticsError, OpticsResult};
use crate::formulas::vertex::effectivity_factor;
use crate::units::{Meters, Millimeters, Unit};

/// Power factor of spectacle magnification.
///
/// ```rust
/// use optics_core::formulas::magnification::power_factor;
///
/// let sm = power_factor(10.0, 12.0).unwrap();
/// assert!((sm - 1.136).abs() < 0.001);
/// ```
pub fn power_factor(power: f64, distance_mm: f64) -> OpticsResult<f64> {
    require_non_negative("distance_mm", distance_mm)?;
    effectivity_factor(Millimeters(distance_mm).into(), power)
}

/// Shape factor of spectacle magnification.
pub fn shape_factor(front_power: f64, center_thickness_mm: f64, index: f64) -> OpticsResult<f64> {
    require_finite("front_power", front_power)?;
    require_non_negative("center_thickness_mm", center_thickness_mm)?;
    require_finite("index", index)?;
    if index <= 1.0 {
        return Err(OpticsError::invalid_input(
            "index",
            index.to_string(),
            "Refractive index must be greater than 1",
        ));
    }

    let t: Meters = Millimeters(center_thickness_mm).into();
    let denominator = 1.0 - (t.0 / index) * front_power;
    if denominator.abs() < 1e-12 {
        return Err(OpticsError::domain_undefined(
            "shape factor",
            "reduced thickness times front power equals 1",
        ));
    }
    Ok(1.0 / denominator)
}

/// Total spectacle magnification.
pub fn total_magnification(
    power: f64,
    distance_mm: f64,
    front_power: f64,
    center_thickness_mm: f64,
    index: f64,
) -> OpticsResult<f64> {
    Ok(shape_factor(front_power, center_thickness_mm, index)? * power_factor(power, distance_mm)?)
}

/// Magnification problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MagnificationInput {
    PowerFactor {
        power: f64,
        distance_mm: f64,
    },
    ShapeFactor {
        front_power: f64,
        center_thickness_mm: f64,
        index: f64,
    },
    Total {
        power: f64,
        distance_mm: f64,
        front_power: f64,
        center_thickness_mm: f64,
        index: f64,
    },
}

/// Evaluate a magnification input.
pub fn calculate(input: &MagnificationInput) -> OpticsResult<FormulaOutput> {
    let value = match *input {
        MagnificationInput::PowerFactor { power, distance_mm } => power_factor(power, distance_mm)?,
        MagnificationInput::ShapeFactor {
            front_power,
            center_thickness_mm,
            index,
        } => shape_factor(front_power, center_thickness_mm, index)?,
        MagnificationInput::Total {
            power,
            distance_mm,
            front_power,
            center_thickness_mm,
            index,
        } => total_magnification(power, distance_mm, front_power, center_thickness_mm, index)?,
    };
    Ok(FormulaOutput::numeric(value, Unit::Magnification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_power_factor_plus_magnifies() {
        let sm = power_factor(10.0, 12.0).unwrap();
        assert!((sm - 1.136).abs() < 0.001, "SM = {}", sm);
    }

    #[test]
    fn test_power_factor_minus_minifies() {
        let sm = power_factor(-8.0, 13.0).unwrap();
        assert!((sm - 0.906).abs() < 0.001, "SM = {}", sm);
    }

    #[test]
    fn test_shape_factor() {
        let sm = shape_factor(8.0, 5.0, 1.5).unwrap();
        assert!((sm - 1.027).abs() < 0.001, "SM = {}", sm);
        assert_eq!(shape_factor(8.0, 0.0, 1.5).unwrap(), 1.0);
    }

    #[test]
    fn test_total() {
        let sm = total_magnification(6.0, 15.0, 9.0, 6.0, 1.5).unwrap();
        assert!((sm - 1.140).abs() < 0.001, "SM = {}", sm);
    }

    #[test]
    fn test_domain_errors() {
        assert_eq!(power_factor(10.0, 100.0).unwrap_err().error_code(), "DOMAIN_UNDEFINED");
        assert_eq!(shape_factor(5.0, 2.0, 0.9).unwrap_err().error_code(), "INVALID_INPUT");
    }

    proptest! {
        #[test]
        fn prop_total_is_product_of_factors(
            power in -15.0f64..15.0,
            distance in 8.0f64..20.0,
            front in 0.5f64..12.0,
            thickness in 1.0f64..10.0,
            index in 1.45f64..1.9,
        ) {
            let total = total_magnification(power, distance, front, thickness, index).unwrap();
            let product = shape_factor(front, thickness, index).unwrap() * power_factor(power, distance).unwrap();
            prop_assert!((total - product).abs() < 1e-12);
        }
    }
}
