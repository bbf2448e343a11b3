//! Error types for lens generation.

use thiserror::Error;

/// A configuration field violates a precondition.
///
/// Raised by the validator before any geometry is computed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    /// Name of the offending configuration field.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// An invariant the validator guarantees was found broken during generation.
///
/// This is a programming defect, not bad user input.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("degenerate geometry (internal invariant violated): {0}")]
pub struct DegenerateGeometryError(pub String);

/// Errors that can occur while building a lens mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LensError {
    /// Bad input parameters.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal invariant violation.
    #[error(transparent)]
    DegenerateGeometry(#[from] DegenerateGeometryError),
}

/// Result type for lens operations.
pub type Result<T> = std::result::Result<T, LensError>;
