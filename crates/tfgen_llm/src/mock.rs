//! Mock generation backend for testing.
//!
//! Returns scripted responses in order and captures every call, so the
//! pipeline can be driven end to end without network access.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::backend::GenerationBackend;
use crate::error::{LlmError, LlmResult};
use crate::session::SessionStore;
use crate::types::Message;

/// Scripted outcome of one `invoke` call.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Successful response text
    Text(String),
    /// Retry budget exhausted
    Unavailable(String),
    /// Non-retryable request failure
    Error(String),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub session_id: String,
    pub prompt: String,
    /// Messages already in the session when the call was made
    pub history_len: usize,
}

/// Mock backend for testing.
///
/// Clones share the response queue, captured calls and session store.
#[derive(Clone, Default)]
pub struct MockBackend {
    responses: Arc<RwLock<VecDeque<MockResponse>>>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    sessions: SessionStore,
}

impl MockBackend {
    /// Create a new mock backend with an empty response queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn add_response(self, text: impl Into<String>) -> Self {
        self.responses.write().push_back(MockResponse::text(text));
        self
    }

    /// Queue a scripted failure (or any other scripted outcome).
    pub fn add_failure(self, response: MockResponse) -> Self {
        self.responses.write().push_back(response);
        self
    }

    /// Get all captured calls.
    pub fn captured_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Calls made under one session, in order.
    pub fn calls_for_session(&self, session_id: &str) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn responses_remaining(&self) -> usize {
        self.responses.read().len()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn invoke(&self, session_id: &str, prompt: &str) -> LlmResult<String> {
        self.captured_calls.write().push(CapturedCall {
            session_id: session_id.to_string(),
            prompt: prompt.to_string(),
            history_len: self.sessions.message_count(session_id),
        });

        let next = self.responses.write().pop_front();
        match next {
            Some(MockResponse::Text(text)) => {
                self.sessions.append_turn(
                    session_id,
                    Message::user(prompt),
                    Message::assistant(text.clone()),
                );
                Ok(text)
            }
            Some(MockResponse::Unavailable(message)) => Err(LlmError::Unavailable {
                attempts: 1,
                last_error: message,
            }),
            Some(MockResponse::Error(message)) => Err(LlmError::Request(message)),
            None => Err(LlmError::Request("No mock response queued".to_string())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
