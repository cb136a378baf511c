//! HTTP client for the chat-completion endpoint.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{ChatMessage, ChatRequest, ChatResponse, ToolSchema};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("API returned no choices")]
    EmptyResponse,
}

/// Abstraction over the completion API, so the agent loop can be driven
/// by a scripted client in tests.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
        max_tokens: u32,
    ) -> Result<ChatResponse, LlmError>;
}

/// Client for an OpenAI-compatible gateway.
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url` (including the `/v1` segment).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for GatewayClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
        max_tokens: u32,
    ) -> Result<ChatResponse, LlmError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tools: tools.map(<[ToolSchema]>::to_vec),
            max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        if parsed.choices.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_handles_trailing_slash() {
        let client = GatewayClient::new("http://localhost:3000/v1/", "any-key");
        assert_eq!(
            client.completions_url(),
            "http://localhost:3000/v1/chat/completions"
        );
    }
}
