//! Error types for stage records.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while checking or serializing stage records.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid architecture: {}", .0.join("; "))]
    InvalidArchitecture(Vec<String>),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
