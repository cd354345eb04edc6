//! # Ophthalmic Optics Formulas
//!
//! Pure functions, one module per calculation family. Every function returns
//! [`OpticsResult`](crate::errors::OpticsResult): bad input is
//! `InvalidInput`, a vanishing denominator is `DomainUndefined`, and nothing
//! ever returns `NaN` or infinity.
//!
//! ## Modules
//!
//! - [`transposition`] - plus/minus cylinder form, spherical equivalent
//! - [`vertex`] - vertex-distance compensation and the shared effectivity factor
//! - [`prism`] - Prentice's Rule, base direction, oblique prism
//! - [`decentration`] - OC decentration and minimum blank size
//! - [`thickness`] - approximate lens thickness from sag
//! - [`base_curve`] - Vogel's Rule and manufactured series
//! - [`magnification`] - spectacle magnification
//! - [`compensated`] - spectacle ↔ contact-lens power
//! - [`registry`] - formula metadata
//!
//! ## Conventions
//!
//! - Powers in dioptres, plus converges
//! - Distances in millimetres at the API, converted internally
//! - Axes in `[0, 180)`, horizontal stored as 0 and printed as 180
//! - Positive vertex change = lens moves away from the eye
//! - Positive decentration = optical centre moves nasally

pub mod base_curve;
pub mod compensated;
pub mod decentration;
pub mod magnification;
pub mod prism;
pub mod registry;
pub mod thickness;
pub mod transposition;
pub mod vertex;

pub use base_curve::{vogel_base_curve, BaseCurveSeries, StepSeries};
pub use compensated::{
    compensate_prescription, contact_to_spectacle, round_to_step, spectacle_to_contact, CompensationDirection,
};
pub use decentration::{
    frame_pd, minimum_blank_size, monocular_decentration, per_lens_decentration, BlankCatalog, FrameMeasurement,
    StandardBlanks,
};
pub use magnification::{power_factor, shape_factor, total_magnification};
pub use prism::{
    induced_base, prentice_prism, required_decentration_mm, resolve_oblique, Direction, Eye, ObliquePrism,
};
pub use registry::{generate_formulas_markdown, FormulaMetadata, Variable};
pub use thickness::{approximate_sag, estimate_thickness, ThicknessResult};
pub use transposition::{spherical_equivalent, transpose, Prescription};
pub use vertex::{compensate, compensate_between, effectivity_factor};
