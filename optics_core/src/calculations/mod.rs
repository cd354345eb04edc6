//! # Calculation Dispatch
//!
//! Every calculation family has an `*Input` type in its formula module. The
//! [`Given`] enum wraps them, one variant per [`CalculationKind`], so a
//! problem's inputs can only ever have the shape its kind expects and a
//! dispatch over kinds is checked for exhaustiveness at compile time.
//!
//! ## JSON Shape
//!
//! ```json
//! {
//!   "kind": "vertex_distance",
//!   "input": { "original_power": -6.0, "original_vertex_mm": 12.0, "new_vertex_mm": 0.0 }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use optics_core::calculations::{calculate, FormulaOutput, Given};
//! use optics_core::formulas::vertex::VertexInput;
//!
//! let given = Given::VertexDistance(VertexInput {
//!     original_power: -6.0,
//!     original_vertex_mm: 12.0,
//!     new_vertex_mm: 0.0,
//! });
//! match calculate(&given).unwrap() {
//!     FormulaOutput::Numeric { value, .. } => assert!((value + 5.60).abs() < 0.01),
//!     FormulaOutput::Text { .. } => unreachable!(),
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::OpticsResult;
use crate::format::format_power;
use crate::formulas::{
    base_curve::{self, BaseCurveInput},
    compensated::{self, CompensatedInput},
    decentration::{self, DecentrationInput},
    magnification::{self, MagnificationInput},
    prism::{self, PrismInput},
    thickness::{self, ThicknessInput},
    transposition::{self, TranspositionInput},
    vertex::{self, VertexInput},
};
use crate::settings::OpticsSettings;
use crate::units::Unit;

/// The eight supported calculation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    Transposition,
    VertexDistance,
    Prism,
    Decentration,
    Thickness,
    BaseCurve,
    Magnification,
    CompensatedPower,
}

impl CalculationKind {
    /// All kinds, in display order
    pub const ALL: [CalculationKind; 8] = [
        CalculationKind::Transposition,
        CalculationKind::VertexDistance,
        CalculationKind::Prism,
        CalculationKind::Decentration,
        CalculationKind::Thickness,
        CalculationKind::BaseCurve,
        CalculationKind::Magnification,
        CalculationKind::CompensatedPower,
    ];

    /// Stable identifier, same as the serde name
    pub fn slug(&self) -> &'static str {
        match self {
            CalculationKind::Transposition => "transposition",
            CalculationKind::VertexDistance => "vertex_distance",
            CalculationKind::Prism => "prism",
            CalculationKind::Decentration => "decentration",
            CalculationKind::Thickness => "thickness",
            CalculationKind::BaseCurve => "base_curve",
            CalculationKind::Magnification => "magnification",
            CalculationKind::CompensatedPower => "compensated_power",
        }
    }

    /// Icon name for the presentation layer
    pub fn icon(&self) -> &'static str {
        match self {
            CalculationKind::Transposition => "repeat",
            CalculationKind::VertexDistance => "move-horizontal",
            CalculationKind::Prism => "triangle",
            CalculationKind::Decentration => "crosshair",
            CalculationKind::Thickness => "layers",
            CalculationKind::BaseCurve => "circle-dot",
            CalculationKind::Magnification => "zoom-in",
            CalculationKind::CompensatedPower => "contact",
        }
    }

    /// Look up a kind by slug
    pub fn from_slug(slug: &str) -> Option<CalculationKind> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

impl fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Kind-specific problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "input", rename_all = "snake_case")]
pub enum Given {
    Transposition(TranspositionInput),
    VertexDistance(VertexInput),
    Prism(PrismInput),
    Decentration(DecentrationInput),
    Thickness(ThicknessInput),
    BaseCurve(BaseCurveInput),
    Magnification(MagnificationInput),
    CompensatedPower(CompensatedInput),
}

impl Given {
    pub fn kind(&self) -> CalculationKind {
        match self {
            Given::Transposition(_) => CalculationKind::Transposition,
            Given::VertexDistance(_) => CalculationKind::VertexDistance,
            Given::Prism(_) => CalculationKind::Prism,
            Given::Decentration(_) => CalculationKind::Decentration,
            Given::Thickness(_) => CalculationKind::Thickness,
            Given::BaseCurve(_) => CalculationKind::BaseCurve,
            Given::Magnification(_) => CalculationKind::Magnification,
            Given::CompensatedPower(_) => CalculationKind::CompensatedPower,
        }
    }
}

/// Result of a calculation: a number with a unit, or formatted text
/// (prescriptions, prism notation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaOutput {
    Numeric { value: f64, unit: Unit },
    Text { value: String },
}

impl FormulaOutput {
    pub fn numeric(value: f64, unit: Unit) -> Self {
        FormulaOutput::Numeric { value, unit }
    }

    pub fn text(value: impl Into<String>) -> Self {
        FormulaOutput::Text { value: value.into() }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            FormulaOutput::Numeric { value, .. } => Some(*value),
            FormulaOutput::Text { .. } => None,
        }
    }
}

impl fmt::Display for FormulaOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaOutput::Numeric { value, unit: Unit::Diopters } => write!(f, "{} D", format_power(*value)),
            FormulaOutput::Numeric {
                value,
                unit: Unit::Magnification,
            } => write!(f, "{:.3}×", value),
            FormulaOutput::Numeric { value, unit } => write!(f, "{:.2} {}", value, unit),
            FormulaOutput::Text { value } => f.write_str(value),
        }
    }
}

/// Evaluate a problem's inputs with default settings.
pub fn calculate(given: &Given) -> OpticsResult<FormulaOutput> {
    calculate_with(given, &OpticsSettings::default())
}

/// Evaluate a problem's inputs with explicit settings.
pub fn calculate_with(given: &Given, settings: &OpticsSettings) -> OpticsResult<FormulaOutput> {
    match given {
        Given::Transposition(input) => transposition::calculate(input),
        Given::VertexDistance(input) => vertex::calculate(input),
        Given::Prism(input) => prism::calculate(input),
        Given::Decentration(input) => decentration::calculate(input, settings),
        Given::Thickness(input) => thickness::calculate(input),
        Given::BaseCurve(input) => base_curve::calculate(input, settings),
        Given::Magnification(input) => magnification::calculate(input),
        Given::CompensatedPower(input) => compensated::calculate(input, settings),
    }
}
