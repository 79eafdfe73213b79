//! Google Gemini backend
//!
//! Gemini differs from the chat-completions protocol in every observable
//! way: the endpoint is templated with the model name, the credential
//! travels as a URL query parameter instead of a header, and both envelopes
//! have their own shapes (`contents`/`parts` on the way in,
//! `candidates[0].content.parts[0].text` on the way out).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LlmError;
use crate::openai_backend::{MAX_TOKENS, TEMPERATURE};
use crate::types::LlmBackend;
use crate::{REQUEST_TIMEOUT, build_http_client};
use async_trait::async_trait;

/// Default Gemini API base; the model name and action are appended per call.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
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

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(provider = "gemini", model = %self.model, "invoking generateContent");

        let body = GenerateContentRequest::new(prompt);
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, REQUEST_TIMEOUT))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::provider(status.as_u16(), &body));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("unparseable provider response: {e}")))?;

        Ok(envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Gemini generateContent request envelope.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn new(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

/// Gemini generateContent response envelope. Missing pieces degrade to an
/// empty content string rather than a parse error.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}
