use std::env;

use tracing::debug;

pub const SERPAPI_BASE: &str = "https://serpapi.com/search.json";
pub const ANTHROPIC_BASE: &str = "https://api.anthropic.com/v1";
const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20240620";
const DEFAULT_MISTRAL_MODEL: &str = "azureai";

const SERPAPI_API_KEY: &str = "SERPAPI_API_KEY";
const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
const AZURE_AI_ENDPOINT: &str = "AZURE_AI_ENDPOINT";
const AZURE_AI_API_KEY: &str = "AZURE_AI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("AZURE_AI_ENDPOINT is not a valid http(s) URL: {0}")]
    InvalidEndpoint(String),
}

/// Secret value that never shows up in `Debug` output or logs.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Clone)]
pub struct SerpApiConfig {
    pub api_key: ApiKey,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct MistralConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub endpoint: String,
}

/// Credentials and endpoints for every external service a run touches.
///
/// Built once at startup and handed to each client constructor; nothing
/// below this point reads the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi: SerpApiConfig,
    pub claude: ClaudeConfig,
    pub mistral: MistralConfig,
}

impl Config {
    /// Load a `.env` file if one exists, then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => debug!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut missing = Vec::new();
        let mut require = |name: &'static str| {
            let value = read(name);
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let serpapi_key = require(SERPAPI_API_KEY);
        let anthropic_key = require(ANTHROPIC_API_KEY);
        let endpoint = require(AZURE_AI_ENDPOINT);
        let azure_key = require(AZURE_AI_API_KEY);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let endpoint = validate_endpoint(&endpoint)?;

        Ok(Self {
            serpapi: SerpApiConfig {
                api_key: ApiKey::new(serpapi_key),
                base_url: SERPAPI_BASE.to_string(),
            },
            claude: ClaudeConfig {
                api_key: ApiKey::new(anthropic_key),
                model: read("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
                base_url: ANTHROPIC_BASE.to_string(),
            },
            mistral: MistralConfig {
                api_key: ApiKey::new(azure_key),
                model: read("AZURE_AI_MODEL").unwrap_or_else(|| DEFAULT_MISTRAL_MODEL.to_string()),
                endpoint,
            },
        })
    }
}

fn validate_endpoint(raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|_| ConfigError::InvalidEndpoint(raw.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        _ => Err(ConfigError::InvalidEndpoint(raw.to_string())),
    }
}
