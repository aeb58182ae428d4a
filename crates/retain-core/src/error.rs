//! Error types for the scheduling engine.

use std::convert::Infallible;

/// Scheduler error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Quality rating outside 1-4, or not an integer
    #[error("Invalid quality: {0} (expected an integer rating from 1 to 4)")]
    InvalidQuality(String),
    /// Weight table failed validation
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    /// Parameter file was not valid JSON
    #[error("Failed to parse parameters: {0}")]
    Parse(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchedulerError {
    /// Whether this error was caused by a bad quality rating
    pub fn is_invalid_quality(&self) -> bool {
        matches!(self, SchedulerError::InvalidQuality(_))
    }
}

// Lets `Rating` itself satisfy the `TryInto<Rating>` bound on `review`.
impl From<Infallible> for SchedulerError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Scheduler result type
pub type Result<T> = std::result::Result<T, SchedulerError>;
