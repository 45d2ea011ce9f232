use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{Message, MessagesRequest, MessagesResponse};
use super::{ChatModel, LlmError, Prompt, error_message};
use crate::config::{ApiKey, ClaudeConfig};

const PROVIDER: &str = "Claude";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// The Messages API requires `max_tokens`; used when the prompt sets none.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct ClaudeClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl ClaudeClient {
    pub fn new(http: Client, config: &ClaudeConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key"),
            model: "claude-test".to_string(),
            base_url: base_url.to_string(),
        }
    }
}

impl ChatModel for ClaudeClient {
    async fn complete(&self, prompt: Prompt<'_>) -> Result<String, LlmError> {
        let url = format!("{}/messages", self.base_url);

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: prompt.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: prompt.system,
            messages: vec![Message {
                role: "user",
                content: prompt.user,
            }],
        };

        debug_assert!(
            url.starts_with("https://") || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .post(&url)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Anthropic API rate limited");
            return Err(LlmError::RateLimited { provider: PROVIDER });
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            warn!(status = %status, "Anthropic API error");
            return Err(LlmError::Api {
                provider: PROVIDER,
                code: status.as_u16(),
                message,
            });
        }

        let body: MessagesResponse = serde_json::from_str(&response.text().await?)?;
        let text: String = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyCompletion { provider: PROVIDER });
        }

        debug!(model = %self.model, chars = text.len(), "claude completion");
        Ok(text)
    }
}
