//! Chat-completion clients for the two language-model providers.

pub mod claude;
pub mod mistral;
mod types;

use serde::Serialize;

pub use claude::ClaudeClient;
pub use mistral::MistralClient;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{provider} rate limit exceeded. Please retry later.")]
    RateLimited { provider: &'static str },

    #[error("{provider} API error ({code}): {message}")]
    Api {
        provider: &'static str,
        code: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed completion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{provider} returned no text")]
    EmptyCompletion { provider: &'static str },
}

/// A single-turn request: one system instruction, one user message.
///
/// `max_tokens: None` leaves the output length to the provider where the API
/// allows it.
#[derive(Debug, Clone, Copy)]
pub struct Prompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub max_tokens: Option<u32>,
}

/// Single-turn text completion.
/// Implemented by `ClaudeClient` and `MistralClient`; mock implementations used in tests.
pub trait ChatModel {
    async fn complete(&self, prompt: Prompt<'_>) -> Result<String, LlmError>;
}

/// Which model writes the final answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Claude,
    Mistral,
}

impl Provider {
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Mistral => "Mistral",
        }
    }
}

/// Pull the error message out of a provider's JSON error body, falling back
/// to the status line and a short body snippet.
pub(crate) fn error_message(status: reqwest::StatusCode, text: &str) -> String {
    serde_json::from_str::<types::ErrorEnvelope>(text)
        .ok()
        .and_then(|e| e.error.and_then(|d| d.message))
        .unwrap_or_else(|| {
            let end = text.floor_char_boundary(200);
            format!("HTTP {status}: {}", &text[..end])
        })
}
