//! OpenAI chat-completions backend
//!
//! This is the default wire shape: a POST to a fixed chat-completions URL
//! with bearer auth, extracting `choices[0].message.content` from the
//! response. OpenRouter reuses the same envelope (see
//! `openrouter_backend`).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LlmError;
use crate::types::LlmBackend;
use crate::{REQUEST_TIMEOUT, build_http_client};
use async_trait::async_trait;

/// Default OpenAI API endpoint
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Tokens requested per generation; enrichment outputs are short.
pub(crate) const MAX_TOKENS: u32 = 500;

/// Sampling temperature used for all three stages.
pub(crate) const TEMPERATURE: f32 = 0.7;

pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a new OpenAI backend.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be
    /// constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(provider = "openai", model = %self.model, "invoking chat completion");

        let body = ChatRequest::new(&self.model, prompt);
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, REQUEST_TIMEOUT))?;

        extract_chat_content(response).await
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Check the status and pull the generated text out of an
/// OpenAI-compatible response. Shared with the OpenRouter backend.
pub(crate) async fn extract_chat_content(
    response: reqwest::Response,
) -> Result<String, LlmError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::provider(status.as_u16(), &body));
    }

    let envelope: ChatResponse = response
        .json()
        .await
        .map_err(|e| LlmError::Transport(format!("unparseable provider response: {e}")))?;

    Ok(envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default())
}

/// OpenAI-compatible chat-completion request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

impl ChatRequest {
    pub(crate) fn new(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI-compatible chat-completion response envelope. Missing pieces
/// degrade to an empty content string rather than a parse error.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ResponseMessage,
}

#[derive(Debug, Deserialize, Default)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
