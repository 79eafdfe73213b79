//! HTTP backends for hosted LLM providers
//!
//! One [`LlmBackend`] implementation per provider (OpenAI, Gemini,
//! OpenRouter), a factory that picks one from configuration, and the
//! [`LlmClient`] wrapper that the orchestration layer calls. All three
//! backends share a single timeout policy and surface failures through
//! [`LlmError`].

use std::time::Duration;

use reviewd_config::Provider;

mod client;
mod error;
mod gemini_backend;
mod openai_backend;
mod openrouter_backend;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini_backend::GeminiBackend;
pub use openai_backend::OpenAiBackend;
pub use openrouter_backend::OpenRouterBackend;
pub use types::{GenerationResult, LlmBackend};

/// Per-request deadline applied to every provider call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_http_client() -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| LlmError::Misconfiguration(format!("failed to build HTTP client: {e}")))
}

/// Construct the backend for `provider`. Called once at client
/// construction; requests never re-select a provider.
///
/// # Errors
///
/// Returns [`LlmError::Misconfiguration`] if the underlying HTTP client
/// cannot be built.
pub fn backend_for(
    provider: Provider,
    api_key: String,
    model: String,
) -> Result<Box<dyn LlmBackend>, LlmError> {
    let backend: Box<dyn LlmBackend> = match provider {
        Provider::OpenAi => Box::new(OpenAiBackend::new(api_key, None, model)?),
        Provider::Gemini => Box::new(GeminiBackend::new(api_key, None, model)?),
        Provider::OpenRouter => Box::new(OpenRouterBackend::new(api_key, None, model)?),
    };
    Ok(backend)
}

/// Scriptable backend for exercising orchestration logic without a
/// network. Not part of the crate's public contract.
#[doc(hidden)]
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::LlmError;
    use crate::types::LlmBackend;

    /// Replays a fixed queue of responses and records the prompts it was
    /// given. Once the queue is exhausted every call fails.
    pub struct ScriptedBackend {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        #[must_use]
        pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Prompts received so far, in call order.
        #[must_use]
        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        /// Number of calls made so far.
        #[must_use]
        pub fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(LlmError::Transport("scripted responses exhausted".into()))
                })
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    // Lets a test hand the client an `Arc` clone and keep one for
    // asserting call counts afterwards.
    #[async_trait]
    impl LlmBackend for std::sync::Arc<ScriptedBackend> {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.as_ref().generate(prompt).await
        }

        fn name(&self) -> &'static str {
            self.as_ref().name()
        }
    }
}
