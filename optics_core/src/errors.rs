//! # Error Types
//!
//! Structured error types for optics_core. Formula functions never panic and
//! never hand `NaN` or infinity back to a caller: bad input and undefined
//! results are reported through [`OpticsError`] so a front end can explain
//! which of the two happened.
//!
//! ## Example
//!
//! ```rust
//! use optics_core::errors::{OpticsError, OpticsResult};
//!
//! fn validate_pd(pd_mm: f64) -> OpticsResult<()> {
//!     if pd_mm <= 0.0 {
//!         return Err(OpticsError::invalid_input(
//!             "patient_pd_mm",
//!             pd_mm.to_string(),
//!             "PD must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_pd(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for optics_core operations
pub type OpticsResult<T> = Result<T, OpticsError>;

/// Structured error type for optics calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum OpticsError {
    /// An input value is missing, non-finite, or outside its documented domain
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The inputs are valid on their own but the formula has no defined
    /// result for this combination (e.g. a vanishing denominator)
    #[error("Undefined result for {formula}: {reason}")]
    DomainUndefined { formula: String, reason: String },

    /// Problem id not present in the bank
    #[error("Problem not found: {id}")]
    ProblemNotFound { id: String },

    /// File I/O error while reading settings
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// TOML/JSON deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl OpticsError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        OpticsError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DomainUndefined error
    pub fn domain_undefined(formula: impl Into<String>, reason: impl Into<String>) -> Self {
        OpticsError::DomainUndefined {
            formula: formula.into(),
            reason: reason.into(),
        }
    }

    /// Create a ProblemNotFound error
    pub fn problem_not_found(id: impl Into<String>) -> Self {
        OpticsError::ProblemNotFound { id: id.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        OpticsError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            OpticsError::InvalidInput { .. } => "INVALID_INPUT",
            OpticsError::DomainUndefined { .. } => "DOMAIN_UNDEFINED",
            OpticsError::ProblemNotFound { .. } => "PROBLEM_NOT_FOUND",
            OpticsError::FileError { .. } => "FILE_ERROR",
            OpticsError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

// =============================================================================
// Input guards shared by the formula modules
// =============================================================================

/// Reject NaN and infinities.
pub(crate) fn require_finite(field: &str, value: f64) -> OpticsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OpticsError::invalid_input(field, value.to_string(), "Value must be a finite number"))
    }
}

/// Reject values that are not strictly positive.
pub(crate) fn require_positive(field: &str, value: f64) -> OpticsResult<f64> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(OpticsError::invalid_input(field, value.to_string(), "Value must be positive"));
    }
    Ok(value)
}

/// Reject negative values (zero allowed).
pub(crate) fn require_non_negative(field: &str, value: f64) -> OpticsResult<f64> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(OpticsError::invalid_input(field, value.to_string(), "Value cannot be negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = OpticsError::invalid_input("axis", "200", "Axis must be in [0, 180)");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: OpticsError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(OpticsError::problem_not_found("x").error_code(), "PROBLEM_NOT_FOUND");
        assert_eq!(
            OpticsError::domain_undefined("vertex compensation", "zero denominator").error_code(),
            "DOMAIN_UNDEFINED"
        );
    }

    #[test]
    fn test_guards() {
        assert!(require_finite("power", f64::NAN).is_err());
        assert!(require_finite("power", f64::INFINITY).is_err());
        assert_eq!(require_finite("power", -2.5).unwrap(), -2.5);
        assert!(require_positive("pd", 0.0).is_err());
        assert!(require_non_negative("vertex", 0.0).is_ok());
        assert!(require_non_negative("vertex", -1.0).is_err());
    }
}
