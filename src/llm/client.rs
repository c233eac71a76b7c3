//! OpenRouter-backed chat completion client.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result, Service};

use super::types::{ChatCompletionResponse, ChatMessage, ToolDefinition};

/// Abstraction over the chat completion provider.
///
/// The production implementation is [`OpenRouterClient`]; tests substitute a
/// scripted mock to drive the conversation loop deterministically.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the message history plus tool schemas, returning the assistant's
    /// next message (either tool calls or final text).
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatMessage>;
}

/// Client for OpenRouter's OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    timeout: std::time::Duration,
}

impl OpenRouterClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout,
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatMessage> {
        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = serde_json::json!(tools);
            }
        }

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(%url, model, "sending chat completion request");

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| Error::Network {
                service: Service::Llm,
                source,
            })?;

        let response = http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| Error::Network {
                service: Service::Llm,
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| Error::Network {
            service: Service::Llm,
            source,
        })?;

        if !status.is_success() {
            return Err(Error::Upstream {
                service: Service::Llm,
                status: status.as_u16(),
                message: extract_provider_error(&text).unwrap_or(text),
            });
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|e| Error::MalformedResponse {
                service: Service::Llm,
                detail: format!("{}", e),
            })?;

        // Some providers report errors inside a 200 body.
        if let Some(error) = value.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown provider error")
                .to_string();
            let code = error
                .get("code")
                .and_then(|c| c.as_u64())
                .unwrap_or(status.as_u16() as u64);
            return Err(Error::Upstream {
                service: Service::Llm,
                status: code as u16,
                message,
            });
        }

        let envelope: ChatCompletionResponse =
            serde_json::from_value(value).map_err(|e| Error::MalformedResponse {
                service: Service::Llm,
                detail: format!("{}", e),
            })?;

        envelope
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| Error::MalformedResponse {
                service: Service::Llm,
                detail: "no choices in response".to_string(),
            })
    }
}

/// Pull `error.message` out of a JSON error body, if the body is one.
fn extract_provider_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_provider_error() {
        let body = r#"{"error": {"message": "invalid api key", "code": 401}}"#;
        assert_eq!(
            extract_provider_error(body).as_deref(),
            Some("invalid api key")
        );
        assert_eq!(extract_provider_error("not json"), None);
        assert_eq!(extract_provider_error(r#"{"choices": []}"#), None);
    }
}
