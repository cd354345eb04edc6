//! # Prescription Transposition
//!
//! Converts a sphero-cylindrical prescription between plus- and minus-cylinder
//! form. Both forms describe the same lens.
//!
//! ## Formulas
//!
//! ```text
//! S' = S + C
//! C' = -C
//! A' = (A + 90) mod 180
//! ```
//!
//! ## Spherical Lenses
//!
//! When `C = 0` there is nothing to transpose. The sphere is returned as-is,
//! the cylinder stays `+0.00` and the axis is passed through unchanged
//! (it carries no meaning on a sphere, but dropping it would make a
//! round-trip lossy).
//!
//! ## Example
//!
//! ```rust
//! use optics_core::formulas::transposition::{transpose, Prescription};
//!
//! let rx: Prescription = "+2.00 +1.00 x 090".parse().unwrap();
//! let flipped = transpose(&rx).unwrap();
//! assert_eq!(flipped.to_string(), "+3.00 -1.00 x 180");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculations::FormulaOutput;
use crate::errors::{require_finite, OpticsError, OpticsResult};
use crate::format::{format_axis, format_power, normalize_answer};
use crate::units::Unit;

/// A sphero-cylindrical prescription for one eye.
///
/// `axis` is stored in `[0, 180)`; the horizontal meridian is `0` internally
/// and printed as `180`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    /// Sphere power (D)
    pub sphere: f64,
    /// Cylinder power (D)
    pub cylinder: f64,
    /// Cylinder axis (degrees)
    pub axis: u16,
}

impl Prescription {
    pub fn new(sphere: f64, cylinder: f64, axis: u16) -> Self {
        Self { sphere, cylinder, axis }
    }

    /// A pure sphere (no cylinder)
    pub fn sphere(sphere: f64) -> Self {
        Self { sphere, cylinder: 0.0, axis: 0 }
    }

    pub fn is_spherical(&self) -> bool {
        self.cylinder == 0.0
    }

    /// Check the prescription is a valid formula input.
    pub fn validate(&self) -> OpticsResult<()> {
        require_finite("sphere", self.sphere)?;
        require_finite("cylinder", self.cylinder)?;
        if self.axis >= 180 {
            return Err(OpticsError::invalid_input(
                "axis",
                self.axis.to_string(),
                "Axis must be in [0, 180); write 180 as 0",
            ));
        }
        Ok(())
    }

    /// Power in the meridian 90° from the axis (sphere + cylinder)
    pub fn second_meridian(&self) -> f64 {
        self.sphere + self.cylinder
    }
}

impl fmt::Display for Prescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_spherical() {
            write!(f, "{} DS", format_power(self.sphere))
        } else {
            write!(
                f,
                "{} {} x {}",
                format_power(self.sphere),
                format_power(self.cylinder),
                format_axis(self.axis)
            )
        }
    }
}

impl FromStr for Prescription {
    type Err = OpticsError;

    /// Parse `"{sphere} {cylinder} x {axis}"`, `"{sphere} DS"` or a bare
    /// sphere. Spacing, `×`, `pl`/`plano` and an axis of `180` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: &str| OpticsError::invalid_input("prescription", s, reason);
        let normalized = normalize_answer(s);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let power = |token: &str| -> OpticsResult<f64> {
            token
                .trim_start_matches('+')
                .parse::<f64>()
                .map_err(|_| bad("Expected a dioptric power"))
        };

        match tokens.as_slice() {
            [sphere] | [sphere, "ds"] => Ok(Prescription::sphere(power(sphere)?)),
            [sphere, cylinder, "x", axis] => {
                let axis: u16 = axis.parse().map_err(|_| bad("Expected an integer axis"))?;
                if axis > 180 {
                    return Err(bad("Axis must be between 0 and 180"));
                }
                let rx = Prescription::new(power(sphere)?, power(cylinder)?, axis % 180);
                rx.validate()?;
                Ok(rx)
            }
            _ => Err(bad("Expected '<sphere> <cylinder> x <axis>' or '<sphere> DS'")),
        }
    }
}

/// Transpose between plus- and minus-cylinder form.
///
/// # Errors
///
/// `InvalidInput` for non-finite powers or an axis outside `[0, 180)`.
pub fn transpose(rx: &Prescription) -> OpticsResult<Prescription> {
    rx.validate()?;

    if rx.is_spherical() {
        return Ok(Prescription::new(rx.sphere, 0.0, rx.axis));
    }

    Ok(Prescription {
        sphere: rx.sphere + rx.cylinder,
        cylinder: -rx.cylinder,
        axis: (rx.axis + 90) % 180,
    })
}

/// Spherical equivalent: `S + C/2`.
pub fn spherical_equivalent(sphere: f64, cylinder: f64) -> OpticsResult<f64> {
    require_finite("sphere", sphere)?;
    require_finite("cylinder", cylinder)?;
    Ok(sphere + cylinder / 2.0)
}

/// Transposition problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TranspositionInput {
    /// Flip cylinder form; answer is a prescription string
    Transpose { sphere: f64, cylinder: f64, axis: u16 },
    /// Collapse to a single power
    SphericalEquivalent { sphere: f64, cylinder: f64 },
}

/// Evaluate a transposition input.
pub fn calculate(input: &TranspositionInput) -> OpticsResult<FormulaOutput> {
    match *input {
        TranspositionInput::Transpose { sphere, cylinder, axis } => {
            let rx = transpose(&Prescription::new(sphere, cylinder, axis))?;
            Ok(FormulaOutput::text(rx.to_string()))
        }
        TranspositionInput::SphericalEquivalent { sphere, cylinder } => {
            let se = spherical_equivalent(sphere, cylinder)?;
            Ok(FormulaOutput::numeric(se, Unit::Diopters))
        }
    }
}
