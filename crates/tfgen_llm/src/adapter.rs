//! LLM adapter for chat completions.
//!
//! Supports OpenAI and Anthropic APIs, selected via settings or environment
//! variables. Each call replays the full history of its session.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::GenerationBackend;
use crate::config::{LlmProvider, LlmSettings};
use crate::error::{LlmError, LlmResult};
use crate::retry::{with_retry, AttemptError, RetryPolicy};
use crate::session::SessionStore;
use crate::types::{Message, MessageRole};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// LLM adapter that handles API calls
pub struct LlmAdapter {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    retry: RetryPolicy,
    client: reqwest::Client,
    sessions: SessionStore,
}

impl LlmAdapter {
    /// Create a new LLM adapter with explicit configuration
    pub fn new(provider: LlmProvider, api_key: String, model: Option<String>) -> Self {
        Self {
            provider,
            api_key,
            model: model.unwrap_or_else(|| provider.default_model().to_string()),
            max_tokens: LlmSettings::default().max_tokens,
            retry: RetryPolicy::default(),
            client: reqwest::Client::new(),
            sessions: SessionStore::new(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Create an LLM adapter from environment variables
    ///
    /// Checks in order:
    /// 1. OPENAI_API_KEY
    /// 2. ANTHROPIC_API_KEY
    pub fn from_env() -> LlmResult<Self> {
        let custom_model = std::env::var("TFGEN_LLM_MODEL").ok().filter(|m| !m.is_empty());

        for provider in [LlmProvider::OpenAI, LlmProvider::Anthropic] {
            if let Some(api_key) = read_key(provider) {
                return Ok(Self::new(provider, api_key, custom_model));
            }
        }

        Err(LlmError::NotConfigured)
    }

    /// Create an LLM adapter from settings, reading the API key from env.
    pub fn from_settings(settings: &LlmSettings) -> LlmResult<Self> {
        let adapter = match settings.provider {
            Some(provider) => {
                let api_key = read_key(provider).ok_or(LlmError::NotConfigured)?;
                let model = settings
                    .model
                    .clone()
                    .or_else(|| std::env::var("TFGEN_LLM_MODEL").ok().filter(|m| !m.is_empty()));
                Self::new(provider, api_key, model)
            }
            None => {
                let mut adapter = Self::from_env()?;
                if let Some(model) = &settings.model {
                    adapter.model = model.clone();
                }
                adapter
            }
        };

        info!(provider = %adapter.provider, model = %adapter.model, "LLM backend configured");
        Ok(adapter
            .with_retry(settings.retry.clone())
            .with_max_tokens(settings.max_tokens))
    }

    /// Get the current provider
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Get the current model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Session history owned by this adapter
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Complete a conversation with the LLM
    async fn complete(&self, messages: &[Message]) -> LlmResult<String> {
        match self.provider {
            LlmProvider::OpenAI => self.complete_openai(messages).await,
            LlmProvider::Anthropic => self.complete_anthropic(messages).await,
        }
    }

    async fn complete_openai(&self, messages: &[Message]) -> LlmResult<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_completion_tokens: Some(self.max_tokens),
        };

        let result: OpenAIResponse = self.post_json(OPENAI_URL, &request).await?;

        if let Some(usage) = &result.usage {
            debug!(
                input_tokens = usage.prompt_tokens,
                output_tokens = usage.completion_tokens,
                "OpenAI usage"
            );
        }

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No response from OpenAI".to_string()))
    }

    async fn complete_anthropic(&self, messages: &[Message]) -> LlmResult<String> {
        // Anthropic requires system message to be separate
        let system = messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.clone());

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system,
            messages: messages
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .map(|m| ChatMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
        };

        let result: AnthropicResponse = self.post_json(ANTHROPIC_URL, &request).await?;

        if let Some(usage) = &result.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Anthropic usage"
            );
        }

        let text: Vec<String> = result.content.into_iter().filter_map(|c| c.text).collect();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse("No response from Anthropic".to_string()));
        }
        Ok(text.join("\n"))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.provider {
            LlmProvider::OpenAI => builder.bearer_auth(&self.api_key),
            LlmProvider::Anthropic => builder
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01"),
        }
    }

    /// POST a JSON request, retrying transient failures per the retry policy.
    async fn post_json<Req, Resp>(&self, url: &str, request: &Req) -> LlmResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send,
    {
        let provider = self.provider.as_str();

        with_retry(&self.retry, provider, move || async move {
            let response = self
                .authorize(self.client.post(url))
                .json(request)
                .send()
                .await
                .map_err(|e| AttemptError::Transient(format!("Network error: {}", e)))?;

            let status = response.status();

            if RetryPolicy::is_retryable_status(status.as_u16()) {
                let body = response.text().await.unwrap_or_default();
                return Err(AttemptError::Transient(format!(
                    "{} API error {}: {}",
                    provider, status, body
                )));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AttemptError::Fatal(LlmError::Request(format!(
                    "{} API error {}: {}",
                    provider, status, body
                ))));
            }

            response.json::<Resp>().await.map_err(|e| {
                AttemptError::Fatal(LlmError::InvalidResponse(format!(
                    "Failed to parse response: {}",
                    e
                )))
            })
        })
        .await
    }
}

#[async_trait]
impl GenerationBackend for LlmAdapter {
    async fn invoke(&self, session_id: &str, prompt: &str) -> LlmResult<String> {
        let mut messages = self.sessions.history(session_id);
        let prompt_message = Message::user(prompt);
        messages.push(prompt_message.clone());

        debug!(
            session = %session_id,
            history = messages.len() - 1,
            prompt_chars = prompt.len(),
            "Invoking {}",
            self.provider
        );

        let reply = self.complete(&messages).await?;
        self.sessions
            .append_turn(session_id, prompt_message, Message::assistant(reply.clone()));
        Ok(reply)
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }
}

fn read_key(provider: LlmProvider) -> Option<String> {
    std::env::var(provider.api_key_var())
        .ok()
        .filter(|key| !key.is_empty())
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

// Anthropic API types
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: Option<String>,
}
