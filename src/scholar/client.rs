use std::time::Duration;

use chrono::Datelike;
use reqwest::Client;
use tracing::{debug, warn};

use super::normalize::normalize_results;
use super::types::{ScholarResponse, SearchResult};
use crate::config::{ApiKey, SerpApiConfig};

const ENGINE: &str = "google_scholar";
const RECENCY_YEARS: i32 = 5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// SerpAPI answers 200 with this message when Scholar simply has no hits.
const NO_RESULTS_MARKER: &str = "hasn't returned any results";

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("SerpAPI rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("SerpAPI error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed SerpAPI response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid SerpAPI URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Scholarly search returning at most `limit` normalized results.
/// Implemented by `ScholarClient` for production; mock implementations used in tests.
pub trait ScholarSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Clone)]
pub struct ScholarClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl ScholarClient {
    pub fn new(http: Client, config: &SerpApiConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key"),
            base_url: format!("{base_url}/search.json"),
        }
    }

    fn request_url(&self, query: &str, limit: usize) -> Result<url::Url, url::ParseError> {
        let min_year = (chrono::Utc::now().year() - RECENCY_YEARS).to_string();
        let num = limit.to_string();
        url::Url::parse_with_params(
            &self.base_url,
            [
                ("engine", ENGINE),
                ("q", query),
                ("num", num.as_str()),
                ("sort", "date"),
                ("as_ylo", min_year.as_str()),
                ("api_key", self.api_key.expose()),
            ],
        )
    }
}

impl ScholarSearch for ScholarClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let url = self.request_url(query, limit)?;

        let response = self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("SerpAPI rate limited");
            return Err(SearchError::RateLimited);
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ScholarResponse>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| {
                    let end = text.floor_char_boundary(200);
                    format!("HTTP {status}: {}", &text[..end])
                });
            warn!(status = %status, "SerpAPI error");
            return Err(SearchError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: ScholarResponse = serde_json::from_str(&text)?;

        let organic = match (body.organic_results, body.error) {
            (Some(organic), _) => organic,
            (None, Some(message)) if !message.contains(NO_RESULTS_MARKER) => {
                warn!(error = %message, "SerpAPI error in 200 response");
                return Err(SearchError::Api {
                    code: status.as_u16(),
                    message,
                });
            }
            (None, _) => Vec::new(),
        };

        let results = normalize_results(organic, limit);
        debug!(query, results = results.len(), "scholar search complete");
        Ok(results)
    }
}
