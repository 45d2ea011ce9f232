use tracing::debug;

use crate::llm::{ChatModel, LlmError, Prompt};

pub const RESEARCH_AREA_COUNT: usize = 3;
const MAX_TOKENS: u32 = 500;

const SYSTEM_PROMPT: &str = r#"You are a search engine specialist with expertise in crafting precise, search engine-friendly queries to retrieve the most relevant and insightful information on any given topic.
Based on the user query, generate a set of 3 research-focused search queries. Each query should be optimized for search engines, covering key aspects such as historical context, current developments, expert opinions, and diverse perspectives.
Ensure that the queries are specific, actionable, and designed to yield high-quality search results.

Following are the examples:
Latest news and articles on the current status of topic.
Expert opinions and analyses on the implications of topic.
Impact of topic on global/regional politics, economy, and society

Generate such different queries based on the user query analyse it and craft a good query that can fetch fine results from web
Output format:

Strictly output in this format:
[
"Research area query 1",
"Research area query 2",
"Research area query 3"
]"#;

#[derive(Debug, thiserror::Error)]
pub enum ExpansionError {
    #[error("query expansion request failed: {0}")]
    Call(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Why the expander's output was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("research areas are not a JSON array of strings: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("expected exactly 3 research areas, got {0}")]
    WrongCount(usize),

    #[error("research area {0} is blank")]
    Blank(usize),
}

/// Ask the model for exactly three research-area queries.
pub async fn expand_query(model: &impl ChatModel, query: &str) -> Result<Vec<String>, ExpansionError> {
    let user = format!("User query: {query}");
    let raw = model
        .complete(Prompt {
            system: SYSTEM_PROMPT,
            user: &user,
            max_tokens: Some(MAX_TOKENS),
        })
        .await?;
    debug!(chars = raw.len(), "expansion response received");
    Ok(parse_research_areas(&raw)?)
}

/// Strict parse: a JSON array of exactly three non-blank strings, nothing else.
pub fn parse_research_areas(raw: &str) -> Result<Vec<String>, ParseError> {
    let areas: Vec<String> = serde_json::from_str(raw.trim())?;
    if areas.len() != RESEARCH_AREA_COUNT {
        return Err(ParseError::WrongCount(areas.len()));
    }
    if let Some(i) = areas.iter().position(|a| a.trim().is_empty()) {
        return Err(ParseError::Blank(i + 1));
    }
    Ok(areas)
}
