//! Generation backend trait.

use async_trait::async_trait;

use crate::error::LlmResult;

/// A text-generation backend.
///
/// Implementations own their session history: a call sees every earlier
/// turn made under the same `session_id` and nothing from other sessions.
/// Transient failures are retried internally; when the retry budget is
/// spent the call fails with [`crate::LlmError::Unavailable`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Submit `prompt` under `session_id` and return the complete response text.
    async fn invoke(&self, session_id: &str, prompt: &str) -> LlmResult<String>;

    /// Short backend name for logs.
    fn name(&self) -> &str {
        "backend"
    }
}
