//! Error types for validation operations

use thiserror::Error;

/// Validation specific errors
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The idea failed pre-validation
    #[error("Invalid idea: {0}")]
    InvalidIdea(String),

    /// A required API key is not configured
    #[error("No {0} configured")]
    MissingApiKey(&'static str),

    /// Search API answered with a non-success status
    #[error("Search failed: {status}")]
    SearchFailed {
        status: u16,
    },

    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A stage did not finish inside the execution budget
    #[error("Stage '{stage}' timed out after {millis}ms")]
    Timeout {
        stage: String,
        millis: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ValidatorError {
    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::SearchFailed { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Convert ValidatorError to validator_core::Error
impl From<ValidatorError> for validator_core::Error {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::InvalidIdea(reason) => validator_core::Error::InvalidInput(reason),
            other => validator_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

/// Convert validator_core::Error to ValidatorError
impl From<validator_core::Error> for ValidatorError {
    fn from(err: validator_core::Error) -> Self {
        match err {
            validator_core::Error::InvalidInput(reason) => ValidatorError::InvalidIdea(reason),
            other => ValidatorError::Other(other.to_string()),
        }
    }
}
