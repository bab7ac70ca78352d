//! Error types for cutplan.

use thiserror::Error;

/// Result type alias for cutplan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or computing a cutting plan.
#[derive(Debug, Error)]
pub enum Error {
    /// Part rejected at creation time.
    #[error("Invalid part: {0}")]
    InvalidPart(String),

    /// Candidate sheet size rejected.
    #[error("Invalid sheet size: {0}")]
    InvalidSheetSize(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A sheet violates the layout invariants (overlap or out of bounds).
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// A single (sort, backend) attempt failed.
    #[error("Packing backend failed: {0}")]
    Backend(String),

    /// No attempt could pack a material/thickness group.
    #[error("Unable to pack group {material} / {thickness}: {reason}")]
    Unpackable {
        /// Material of the failed group.
        material: String,
        /// Thickness of the failed group.
        thickness: f64,
        /// Human-readable reason.
        reason: String,
    },

    /// Wall-clock budget exceeded.
    #[error("Timeout exceeded after {0}ms")]
    Timeout(u64),

    /// Calculation cancelled.
    #[error("Calculation cancelled")]
    Cancelled,

    /// Another calculation is already running on this engine.
    #[error("A calculation is already in progress")]
    Busy,

    /// Serialization error.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true for errors that end a whole calculation without a plan.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Error::Unpackable { .. } | Error::Timeout(_) | Error::Cancelled | Error::Busy
        )
    }
}
