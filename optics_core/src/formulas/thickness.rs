//! # Lens Thickness Estimation
//!
//! Approximate thickness from the sagitta of the powered surface. This is
//! the paraxial approximation taught for dispensing exams, not an exact
//! spherical-sag calculation:
//!
//! ```text
//! sag = r² · |F| / (1000 · (n - 1) · k)        k = 2
//! ```
//!
//! with `r` the semi-diameter in mm (plus any decentration, which pushes the
//! thick edge farther out), `F` in dioptres and `n` the refractive index.
//! The result is in mm. `k` is kept as a named constant so the numbers stay
//! comparable with the worked problems.
//!
//! ## Centre/Edge Asymmetry
//!
//! - Minus lens: thinnest at the centre. `edge = centre + sag`.
//! - Plus lens: thinnest at the edge. `centre = edge + sag`.

use serde::{Deserialize, Serialize};

use crate::calculations::FormulaOutput;
use crate::errors::{require_finite, require_non_negative, require_positive, OpticsError, OpticsResult};
use crate::units::Unit;

/// Calibration divisor of the sag approximation.
pub const SAG_CALIBRATION: f64 = 2.0;

/// Approximate surface sag (mm).
pub fn approximate_sag(semi_diameter_mm: f64, power: f64, index: f64) -> OpticsResult<f64> {
    require_non_negative("semi_diameter_mm", semi_diameter_mm)?;
    require_finite("power", power)?;
    require_finite("index", index)?;
    if index <= 1.0 {
        return Err(OpticsError::invalid_input(
            "index",
            index.to_string(),
            "Refractive index must be greater than 1",
        ));
    }
    Ok(semi_diameter_mm.powi(2) * power.abs() / (1000.0 * (index - 1.0) * SAG_CALIBRATION))
}

/// Thickness problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThicknessInput {
    /// Lens power (D)
    pub power: f64,
    /// Refractive index
    pub index: f64,
    /// Lens (or effective) diameter (mm)
    pub diameter_mm: f64,
    /// Thinnest point: centre thickness for minus, edge thickness for plus (mm)
    pub min_thickness_mm: f64,
    /// Decentration added to the semi-diameter (mm)
    #[serde(default)]
    pub decentration_mm: f64,
}

impl ThicknessInput {
    pub fn validate(&self) -> OpticsResult<()> {
        require_finite("power", self.power)?;
        require_positive("diameter_mm", self.diameter_mm)?;
        require_non_negative("min_thickness_mm", self.min_thickness_mm)?;
        require_finite("decentration_mm", self.decentration_mm)?;
        Ok(())
    }

    /// Semi-diameter including decentration (mm)
    pub fn semi_diameter_mm(&self) -> f64 {
        self.diameter_mm / 2.0 + self.decentration_mm.abs()
    }
}

/// Estimated thicknesses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThicknessResult {
    pub center_mm: f64,
    pub edge_mm: f64,
    pub sag_mm: f64,
}

impl ThicknessResult {
    /// Thickest point of the lens
    pub fn max_mm(&self) -> f64 {
        self.center_mm.max(self.edge_mm)
    }
}

/// Estimate centre and edge thickness.
pub fn estimate_thickness(input: &ThicknessInput) -> OpticsResult<ThicknessResult> {
    input.validate()?;
    let sag = approximate_sag(input.semi_diameter_mm(), input.power, input.index)?;
    let thin = input.min_thickness_mm;

    let (center_mm, edge_mm) = if input.power < 0.0 {
        (thin, thin + sag)
    } else {
        (thin + sag, thin)
    };
    Ok(ThicknessResult {
        center_mm,
        edge_mm,
        sag_mm: sag,
    })
}

/// Evaluate a thickness input; the answer is the thickest point.
pub fn calculate(input: &ThicknessInput) -> OpticsResult<FormulaOutput> {
    let result = estimate_thickness(input)?;
    Ok(FormulaOutput::numeric(result.max_mm(), Unit::Millimeters))
}
