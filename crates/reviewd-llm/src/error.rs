//! Error taxonomy for LLM backend invocations
//!
//! These errors never cross the crate boundary as failures: `LlmClient`
//! converts every one of them into a result-level error string so callers
//! observe degraded output, not faults.

use std::time::Duration;

use thiserror::Error;

/// Maximum number of characters of a provider error body carried in an
/// error message.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Failure modes of a single generation call.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Configuration problem detected before any network call (missing
    /// credential, unbuildable HTTP client). Terminal per call, no retry.
    #[error("{0}")]
    Misconfiguration(String),

    /// Transport-level failure: connection, DNS, or an unparseable
    /// provider response envelope.
    #[error("LLM request failed: {0}")]
    Transport(String),

    /// The request exceeded the fixed per-call ceiling.
    #[error("LLM request timed out after {}s", .duration.as_secs())]
    Timeout { duration: Duration },

    /// The provider answered with a non-2xx status. Carries the status and
    /// a truncated body snippet for diagnostics.
    #[error("API error {status}: {body}")]
    Provider { status: u16, body: String },
}

impl LlmError {
    /// Build a provider-status error, truncating the body to a snippet.
    #[must_use]
    pub fn provider(status: u16, body: &str) -> Self {
        Self::Provider {
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }

    /// Classify a reqwest failure as timeout or transport.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { duration: timeout }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_truncates_body() {
        let long_body = "x".repeat(500);
        let err = LlmError::provider(502, &long_body);
        match &err {
            LlmError::Provider { status, body } => {
                assert_eq!(*status, 502);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("API error 502: xxx"));
    }

    #[test]
    fn provider_error_truncation_is_char_safe() {
        let body = "é".repeat(300);
        let err = LlmError::provider(500, &body);
        match err {
            LlmError::Provider { body, .. } => {
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn timeout_display_mentions_seconds() {
        let err = LlmError::Timeout {
            duration: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "LLM request timed out after 30s");
    }
}
