//! Error-absorbing client wrapper over a backend
//!
//! `LlmClient` is the seam the rest of the service talks to: it owns one
//! constructed backend (or none, when no credential is configured), times
//! every call, and converts every backend failure into a result-level
//! error so that no `LlmError` ever escapes to a caller.

use std::time::Instant;

use tracing::{debug, warn};

use reviewd_config::Config;

use crate::backend_for;
use crate::types::{GenerationResult, LlmBackend};

/// Error text used when no credential is configured. Also the signal the
/// orchestrator's tests look for, so keep it stable.
const MISSING_KEY_ERROR: &str = "LLM_API_KEY not configured";

pub struct LlmClient {
    backend: Option<Box<dyn LlmBackend>>,
    provider: String,
    model: String,
}

impl LlmClient {
    /// Wrap an already-constructed backend.
    #[must_use]
    pub fn new(backend: Box<dyn LlmBackend>, model: impl Into<String>) -> Self {
        let provider = backend.name().to_string();
        Self {
            backend: Some(backend),
            provider,
            model: model.into(),
        }
    }

    /// A client with no backend: every call returns an immediate
    /// configuration error with zero latency.
    #[must_use]
    pub fn disabled(model: impl Into<String>) -> Self {
        Self {
            backend: None,
            provider: "none".to_string(),
            model: model.into(),
        }
    }

    /// Build a client from service configuration. Provider selection
    /// happens here, exactly once; an absent API key yields a disabled
    /// client rather than an error, since the service degrades to fallback
    /// content instead of refusing to start.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let provider = config.provider.as_str().to_string();

        let Some(api_key) = config.api_key.clone() else {
            warn!("LLM_API_KEY not set; all generations will use fallback content");
            let mut client = Self::disabled(config.model.clone());
            client.provider = provider;
            return client;
        };

        match backend_for(config.provider, api_key, config.model.clone()) {
            Ok(backend) => Self::new(backend, config.model.clone()),
            Err(err) => {
                warn!(error = %err, "LLM backend construction failed; generations disabled");
                let mut client = Self::disabled(config.model.clone());
                client.provider = provider;
                client
            }
        }
    }

    /// Provider identifier recorded in stored outputs.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        &self.provider
    }

    /// Model identifier recorded in stored outputs.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Execute one generation call, absorbing all failures.
    ///
    /// Latency is measured around the network call, inclusive of failure
    /// paths, and is 0 when no call was attempted.
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        let Some(backend) = self.backend.as_deref() else {
            return GenerationResult::failure(MISSING_KEY_ERROR, 0);
        };

        let start = Instant::now();
        let outcome = backend.generate(prompt).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    debug!(
                        provider = backend.name(),
                        latency_ms, "generation returned no content"
                    );
                    GenerationResult::empty(latency_ms)
                } else {
                    debug!(
                        provider = backend.name(),
                        latency_ms,
                        chars = trimmed.chars().count(),
                        "generation succeeded"
                    );
                    GenerationResult::success(trimmed, latency_ms)
                }
            }
            Err(err) => {
                warn!(provider = backend.name(), latency_ms, error = %err, "generation failed");
                GenerationResult::failure(err.to_string(), latency_ms)
            }
        }
    }
}
