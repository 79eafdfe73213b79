//! Core types for the LLM backend abstraction

use async_trait::async_trait;

use crate::error::LlmError;

/// Outcome of one generation call, normalized across providers and failure
/// modes.
///
/// `latency_ms` is always populated and measures wall time around the
/// network call, inclusive of failure paths; it is 0 when no call was
/// attempted (missing credentials). `text` and `error` encode three states:
///
/// - `Some(text), None` — success with usable content
/// - `None, Some(error)` — the call failed
/// - `None, None` — the call succeeded but the provider returned no content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Trimmed generated text, when the call produced any.
    pub text: Option<String>,
    /// Failure description, when the call failed.
    pub error: Option<String>,
    /// Wall time of the call in milliseconds.
    pub latency_ms: u64,
}

impl GenerationResult {
    /// Successful generation with non-empty trimmed text.
    #[must_use]
    pub fn success(text: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            text: Some(text.into()),
            error: None,
            latency_ms,
        }
    }

    /// Failed generation.
    #[must_use]
    pub fn failure(error: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            text: None,
            error: Some(error.into()),
            latency_ms,
        }
    }

    /// Call succeeded but yielded no usable content.
    #[must_use]
    pub fn empty(latency_ms: u64) -> Self {
        Self {
            text: None,
            error: None,
            latency_ms,
        }
    }
}

/// One LLM provider wire protocol.
///
/// Implementations translate a single "generate text from prompt" request
/// into their provider's envelope and extract the generated text from the
/// response. They do not retry and do not catch their own errors; both
/// policies live above this trait.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Execute one generation call.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` for transport failures, timeouts, and non-2xx
    /// provider responses. A well-formed response whose content field is
    /// missing yields `Ok` with an empty string, not an error.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider name for logs and diagnostics.
    fn name(&self) -> &'static str;
}
