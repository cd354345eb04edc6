//! # Compensated Power (Spectacle ↔ Contact Lens)
//!
//! A contact lens sits on the cornea (vertex 0 mm). Converting between a
//! spectacle prescription and a contact-lens power is vertex compensation
//! with one side fixed at zero, so both directions go through
//! [`compensate_between`] and can never drift from it.
//!
//! - spectacle → contact: the lens moves closer. Minus gets weaker, plus
//!   gets stronger.
//! - contact → spectacle: the lens moves away. Minus gets stronger, plus
//!   gets weaker.
//!
//! Contact lenses are stocked in 0.25 D steps, so the compensated power is
//! usually rounded to the nearest available step.

use serde::{Deserialize, Serialize};

use crate::calculations::FormulaOutput;
use crate::errors::{require_finite, require_non_negative, require_positive, OpticsResult};
use crate::formulas::transposition::Prescription;
use crate::formulas::vertex::compensate_between;
use crate::settings::OpticsSettings;
use crate::units::Unit;

/// Which way the power is being carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationDirection {
    SpectacleToContact,
    ContactToSpectacle,
}

/// Contact-lens power for a spectacle power worn at `vertex_mm`.
///
/// ```rust
/// use optics_core::formulas::compensated::spectacle_to_contact;
///
/// let cl = spectacle_to_contact(-5.0, 12.0).unwrap();
/// assert!((cl - (-4.72)).abs() < 0.01);
/// ```
pub fn spectacle_to_contact(spectacle_power: f64, vertex_mm: f64) -> OpticsResult<f64> {
    compensate_between(spectacle_power, vertex_mm, 0.0)
}

/// Spectacle power, worn at `vertex_mm`, equivalent to a contact-lens power.
pub fn contact_to_spectacle(contact_power: f64, vertex_mm: f64) -> OpticsResult<f64> {
    compensate_between(contact_power, 0.0, vertex_mm)
}

/// Compensate in the given direction.
pub fn compensate_power(power: f64, vertex_mm: f64, direction: CompensationDirection) -> OpticsResult<f64> {
    match direction {
        CompensationDirection::SpectacleToContact => spectacle_to_contact(power, vertex_mm),
        CompensationDirection::ContactToSpectacle => contact_to_spectacle(power, vertex_mm),
    }
}

/// Round to the nearest multiple of `step` (ties away from zero).
pub fn round_to_step(value: f64, step: f64) -> OpticsResult<f64> {
    require_finite("value", value)?;
    require_positive("step", step)?;
    Ok((value / step).round() * step)
}

/// Compensate both principal meridians of a toric spectacle prescription.
///
/// Each meridian is compensated independently and the cylinder rebuilt from
/// the difference; the axis is unchanged.
pub fn compensate_prescription(rx: &Prescription, vertex_mm: f64, direction: CompensationDirection) -> OpticsResult<Prescription> {
    rx.validate()?;
    require_non_negative("vertex_mm", vertex_mm)?;

    let sphere = compensate_power(rx.sphere, vertex_mm, direction)?;
    if rx.is_spherical() {
        return Ok(Prescription::new(sphere, 0.0, rx.axis));
    }
    let second = compensate_power(rx.second_meridian(), vertex_mm, direction)?;
    Ok(Prescription::new(sphere, second - sphere, rx.axis))
}

/// Compensated-power problem inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensatedInput {
    /// Power to carry (D)
    pub power: f64,
    /// Spectacle vertex distance (mm)
    pub vertex_mm: f64,
    pub direction: CompensationDirection,
    /// Round to the contact-lens power step
    #[serde(default)]
    pub round_to_step: bool,
}

/// Evaluate a compensated-power input.
pub fn calculate(input: &CompensatedInput, settings: &OpticsSettings) -> OpticsResult<FormulaOutput> {
    let mut power = compensate_power(input.power, input.vertex_mm, input.direction)?;
    if input.round_to_step {
        power = round_to_step(power, settings.contact_lens_step_d)?;
    }
    Ok(FormulaOutput::numeric(power, Unit::Diopters))
}
