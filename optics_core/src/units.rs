//! # Unit Types
//!
//! Lightweight wrappers for the lengths that appear in dispensing formulas,
//! plus the [`Unit`] tag attached to numeric results.
//!
//! Opticians measure in millimetres, Prentice's Rule is stated in
//! centimetres, and vergence formulas need metres. Mixing those up is the
//! classic factor-of-ten bug, so the conversions live here and nowhere else.
//!
//! ## Example
//!
//! ```rust
//! use optics_core::units::{Centimeters, Meters, Millimeters};
//!
//! let vertex = Millimeters(12.0);
//! let m: Meters = vertex.into();
//! assert!((m.0 - 0.012).abs() < 1e-12);
//!
//! let cm: Centimeters = Millimeters(5.0).into();
//! assert_eq!(cm.0, 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in centimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Centimeters {
    fn from(mm: Millimeters) -> Self {
        Centimeters(mm.0 / 10.0)
    }
}

impl From<Centimeters> for Millimeters {
    fn from(cm: Centimeters) -> Self {
        Millimeters(cm.0 * 10.0)
    }
}

// ============================================================================
// Result Units
// ============================================================================

/// Unit attached to a numeric answer.
///
/// Serializes as the symbol printed next to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Dioptres of refractive power
    #[serde(rename = "D")]
    Diopters,
    /// Prism dioptres
    #[serde(rename = "Δ")]
    PrismDiopters,
    /// Millimetres
    #[serde(rename = "mm")]
    Millimeters,
    /// Dimensionless magnification ratio
    #[serde(rename = "×")]
    Magnification,
}

impl Unit {
    /// Symbol used in display strings
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Diopters => "D",
            Unit::PrismDiopters => "Δ",
            Unit::Millimeters => "mm",
            Unit::Magnification => "×",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let m: Meters = Millimeters(13.0).into();
        assert!((m.0 - 0.013).abs() < 1e-12);

        let back: Millimeters = m.into();
        assert!((back.0 - 13.0).abs() < 1e-9);

        let mm: Millimeters = Centimeters(0.4).into();
        assert!((mm.0 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Unit::Diopters).unwrap(), "\"D\"");
        assert_eq!(serde_json::to_string(&Unit::PrismDiopters).unwrap(), "\"Δ\"");
        let unit: Unit = serde_json::from_str("\"mm\"").unwrap();
        assert_eq!(unit, Unit::Millimeters);
        assert_eq!(Unit::Magnification.to_string(), "×");
    }
}
