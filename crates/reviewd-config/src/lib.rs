//! Process-wide configuration for reviewd
//!
//! Configuration is read from the environment exactly once at startup and is
//! immutable afterwards. There is no hot reload and no global state; the
//! resulting [`Config`] is passed down explicitly to the components that
//! need it.

use std::net::SocketAddr;

use thiserror::Error;

/// Default bind address for the HTTP server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Configuration errors surfaced at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// LLM provider wire protocols supported by reviewd.
///
/// This is a closed set: provider selection happens once, when the backend
/// is constructed, never per call. Unrecognized provider names behave as
/// [`Provider::OpenAi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// OpenAI chat-completions API
    OpenAi,
    /// Google Gemini generateContent API
    Gemini,
    /// OpenRouter routing proxy (OpenAI-compatible plus identifying headers)
    OpenRouter,
}

impl Provider {
    /// Parse a provider name, case-insensitively.
    ///
    /// Unknown names fall back to `OpenAi` rather than erroring, so a
    /// misspelled `LLM_PROVIDER` degrades to the default wire shape instead
    /// of refusing to start.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "gemini" => Self::Gemini,
            "openrouter" => Self::OpenRouter,
            _ => Self::OpenAi,
        }
    }

    /// Provider name as used in logs and stored metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Default model identifier for this provider, used when `LLM_MODEL`
    /// is not set.
    #[must_use]
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenRouter => "openai/gpt-4o-mini",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable service configuration, read once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream LLM credential. `None` short-circuits every generation
    /// call to an immediate error result; the service still starts.
    pub api_key: Option<String>,
    /// Selected provider wire protocol.
    pub provider: Provider,
    /// Model identifier sent to the provider.
    pub model: String,
    /// HTTP bind address.
    pub bind: SocketAddr,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Recognized variables: `LLM_API_KEY`, `LLM_PROVIDER`, `LLM_MODEL`,
    /// `REVIEWD_BIND`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `REVIEWD_BIND` is set but is
    /// not a valid socket address.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
        let provider = std::env::var("LLM_PROVIDER")
            .map(|p| Provider::parse(&p))
            .unwrap_or(Provider::OpenAi);
        let model = std::env::var("LLM_MODEL")
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        let bind_raw = std::env::var("REVIEWD_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "REVIEWD_BIND".to_string(),
                value: bind_raw,
            })?;

        Ok(Self {
            api_key,
            provider,
            model,
            bind,
        })
    }
}
