//! Configuration management for pitwall.
//!
//! Configuration can be set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. Your OpenRouter API key.
//! - `PITWALL_MODEL` - Optional. The LLM model to use. Defaults to `openai/gpt-4o-mini`.
//! - `OPENROUTER_BASE_URL` - Optional. Defaults to `https://openrouter.ai/api/v1`.
//! - `OPENF1_BASE_URL` - Optional. Defaults to `https://api.openf1.org/v1`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_TOOL_ITERATIONS` - Optional. Cap on tool-call round trips per turn. Defaults to `5`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Timeout for each upstream request. Defaults to `30`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouter API key
    pub api_key: String,

    /// LLM model identifier (OpenRouter format)
    pub model: String,

    /// Base URL of the OpenAI-compatible chat completions API
    pub llm_base_url: String,

    /// Base URL of the openF1 data API
    pub openf1_base_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum tool-call round trips per conversation turn
    pub max_tool_iterations: usize,

    /// Timeout applied to each request against either upstream
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let model = std::env::var("PITWALL_MODEL")
            .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string());

        let llm_base_url = std::env::var("OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());

        let openf1_base_url = std::env::var("OPENF1_BASE_URL")
            .unwrap_or_else(|_| "https://api.openf1.org/v1".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_tool_iterations = std::env::var("MAX_TOOL_ITERATIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_TOOL_ITERATIONS".to_string(), format!("{}", e))
            })?;

        let timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            api_key,
            model,
            llm_base_url,
            openf1_base_url,
            host,
            port,
            max_tool_iterations,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            llm_base_url: "https://openrouter.ai/api/v1".to_string(),
            openf1_base_url: "https://api.openf1.org/v1".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_tool_iterations: 5,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new("test-key".to_string(), "test-model".to_string());
        assert_eq!(config.max_tool_iterations, 5);
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.openf1_base_url, "https://api.openf1.org/v1");
    }
}
