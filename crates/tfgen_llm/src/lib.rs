//! # tfgen_llm - Generation backend for tfgen
//!
//! Every pipeline stage is one round-trip to a text-generation backend:
//! a prompt goes in, the complete response text comes out.
//!
//! ## Key Features
//!
//! - **Sessions**: calls sharing a session id see each other's prior turns;
//!   calls under different ids are isolated
//! - **Retry**: transient failures (429, 500, 503, 504, transport errors) are
//!   retried with exponential backoff up to a fixed attempt count
//! - **Providers**: OpenAI and Anthropic, selected from settings or env
//! - **Mock Backend**: scripted responses and captured calls for tests
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐  invoke(session, prompt)  ┌──────────────┐
//! │ GenerationBackend│──────────────────────────▶│  LlmAdapter  │──▶ HTTP
//! └──────────────────┘                           └──────┬───────┘
//!                                                       ▼
//!                                               ┌──────────────┐
//!                                               │ SessionStore │
//!                                               └──────────────┘
//! ```

pub mod adapter;
pub mod backend;
pub mod config;
pub mod error;
pub mod mock;
pub mod retry;
pub mod session;
pub mod types;

pub use adapter::LlmAdapter;
pub use backend::GenerationBackend;
pub use config::{LlmProvider, LlmSettings};
pub use error::{LlmError, LlmResult};
pub use mock::{CapturedCall, MockBackend, MockResponse};
pub use retry::{with_retry, AttemptError, RetryPolicy, RETRYABLE_STATUSES};
pub use session::SessionStore;
pub use types::{Message, MessageRole, SessionId};
