//! Error types for ndreco-core.

use thiserror::Error;

/// Result type alias for ndreco operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types.
#[derive(Error, Debug)]
pub enum Error {
    /// An invalid parameter value was supplied.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Outcome of a single hit/particle creation attempt.
///
/// Routine per-object anomalies (non-finite coordinates, duplicate
/// identifiers) are expected and reported as an explicit outcome rather
/// than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationOutcome {
    /// The object was created.
    Created,
    /// The object was skipped because its input was invalid.
    SkippedInvalid,
}

impl CreationOutcome {
    /// Returns true if the object was created.
    #[must_use]
    pub fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }
}
