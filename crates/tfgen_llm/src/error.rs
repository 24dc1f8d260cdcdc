//! Error types for the generation backend.

use thiserror::Error;

/// Result type for backend operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Generation backend errors
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key found for any provider
    #[error("LLM not configured. Set OPENAI_API_KEY or ANTHROPIC_API_KEY")]
    NotConfigured,

    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),

    /// Retry budget exhausted on transient failures
    #[error("Backend unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },

    /// Non-retryable request failure
    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Whether the error came from exhausting the retry budget.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
