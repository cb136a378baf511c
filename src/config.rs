//! Configuration management for the gateway agent.
//!
//! Configuration can be set via environment variables:
//! - `GATEWAY_BASE_URL` - Optional. Base URL of the chat gateway. Defaults to `http://localhost:3000/v1`.
//! - `GATEWAY_API_KEY` - Optional. API key sent as a bearer token. Defaults to `any-key`
//!   (the gateway does not verify it).
//! - `GATEWAY_MODEL` - Optional. The model identifier to request. Defaults to `custom-claude-4-sonnet`.
//! - `MAX_TOKENS` - Optional. Completion token budget per API call. Defaults to `500`.
//! - `MAX_TOOL_ROUNDS` - Optional. Maximum tool-call rounds per query. Defaults to `8`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
///
/// Passed explicitly into [`crate::agent::Agent::new`]; there is no
/// process-wide client state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the OpenAI-compatible gateway (including the `/v1` segment)
    pub base_url: String,

    /// API key sent as a bearer token
    pub api_key: String,

    /// Model identifier requested on every completion call
    pub model: String,

    /// Completion token budget per API call
    pub max_tokens: u32,

    /// Maximum tool-call rounds before a query is aborted
    pub max_tool_rounds: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("GATEWAY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/v1".to_string());

        let api_key = std::env::var("GATEWAY_API_KEY").unwrap_or_else(|_| "any-key".to_string());

        let model = std::env::var("GATEWAY_MODEL")
            .unwrap_or_else(|_| "custom-claude-4-sonnet".to_string());

        let max_tokens = std::env::var("MAX_TOKENS")
            .unwrap_or_else(|_| "500".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_TOKENS".to_string(), format!("{}", e)))?;

        let max_tool_rounds = std::env::var("MAX_TOOL_ROUNDS")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_TOOL_ROUNDS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            base_url,
            api_key,
            model,
            max_tokens,
            max_tool_rounds,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
            max_tokens: 500,
            max_tool_rounds: 8,
        }
    }
}
