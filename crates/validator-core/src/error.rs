//! Error types for validator-core

use thiserror::Error;

/// Result type alias for validator-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// The idea was rejected before any stage ran
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// A stage needed output from an earlier stage that is not in the context
    #[error("Missing stage output: {0}")]
    MissingStage(String),

    /// A stage output could not be converted to or from JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
