use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, Message};
use super::{ChatModel, LlmError, Prompt, error_message};
use crate::config::{ApiKey, MistralConfig};

const PROVIDER: &str = "Mistral";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Mistral deployed behind an Azure AI endpoint (OpenAI-style chat completions).
#[derive(Clone)]
pub struct MistralClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    endpoint: String,
}

impl MistralClient {
    pub fn new(http: Client, config: &MistralConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, endpoint: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key"),
            model: "azureai".to_string(),
            endpoint: endpoint.to_string(),
        }
    }
}

impl ChatModel for MistralClient {
    async fn complete(&self, prompt: Prompt<'_>) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: prompt.system,
                },
                Message {
                    role: "user",
                    content: prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Azure AI endpoint rate limited");
            return Err(LlmError::RateLimited { provider: PROVIDER });
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            warn!(status = %status, "Azure AI endpoint error");
            return Err(LlmError::Api {
                provider: PROVIDER,
                code: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = serde_json::from_str(&response.text().await?)?;
        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyCompletion { provider: PROVIDER })?;

        debug!(model = %self.model, chars = text.len(), "mistral completion");
        Ok(text)
    }
}
