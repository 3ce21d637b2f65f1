//! Engine error types

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the analytics, scheduling and content-gate operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded, retry in {retry_after_ms} ms")]
    RateLimited { retry_after_ms: i64 },

    #[error("Invalid generated content: {0}")]
    InvalidContent(String),

    #[error("Content generation failed: {0}")]
    Generation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<EngineError> for String {
    fn from(err: EngineError) -> Self {
        err.to_string()
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
