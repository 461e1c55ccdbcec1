//! Pipeline error types.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error types.
#[derive(Error, Debug)]
pub enum Error {
    /// A named context does not exist.
    #[error("unknown context: {0}")]
    UnknownContext(String),

    /// A context with the same name is already registered.
    #[error("context {0} is already registered")]
    DuplicateContext(String),

    /// An operation was invoked out of setup order.
    #[error("{operation} requires stage {required}, but the orchestrator is in stage {current}")]
    SetupOrder {
        /// The operation that was attempted.
        operation: &'static str,
        /// The stage the operation requires.
        required: &'static str,
        /// The stage the orchestrator is actually in.
        current: &'static str,
    },

    /// The reconstruction framework reported a fatal failure.
    #[error("framework error: {0}")]
    Framework(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] ndreco_core::Error),
}
