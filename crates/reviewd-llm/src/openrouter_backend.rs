//! OpenRouter backend
//!
//! OpenRouter speaks the OpenAI chat-completions protocol through a routing
//! proxy; the only differences are the endpoint and two identifying headers
//! the proxy requires on every request.

use tracing::debug;

use crate::error::LlmError;
use crate::openai_backend::{ChatRequest, extract_chat_content};
use crate::types::LlmBackend;
use crate::{REQUEST_TIMEOUT, build_http_client};
use async_trait::async_trait;

/// Default OpenRouter API endpoint
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// HTTP referer header value identifying this application to the proxy
const DEFAULT_REFERER: &str = "https://reviewd.dev";

/// X-Title header value
const DEFAULT_TITLE: &str = "reviewd";

pub struct OpenRouterBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterBackend {
    /// Create a new OpenRouter backend.
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
impl LlmBackend for OpenRouterBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(provider = "openrouter", model = %self.model, "invoking chat completion");

        let body = ChatRequest::new(&self.model, prompt);
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", DEFAULT_REFERER)
            .header("X-Title", DEFAULT_TITLE)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, REQUEST_TIMEOUT))?;

        extract_chat_content(response).await
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}
