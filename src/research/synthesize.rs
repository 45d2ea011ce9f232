use tracing::debug;

use crate::llm::{ChatModel, ClaudeClient, LlmError, MistralClient, Prompt, Provider};
use crate::scholar::SearchResult;

/// Claude's answer budget. Mistral answers are left uncapped.
const CLAUDE_MAX_TOKENS: u32 = 1024;

const SCHOLAR_ROLE: &str = "You are a knowledgeable research scholar tasked with providing a comprehensive and accurate answer based on the following user query and web search results.
Your response should be well-structured, informative, and cite relevant sources when necessary.
Consider the credibility, relevance, and recency of the information available in the search results.";

const SCHOLAR_INSTRUCTIONS: &str = "Instructions:
Analyze the Query: Understand the user's question or inquiry.
Evaluate the Sources: Review the provided web search results, noting the relevance, credibility, and citation count of each source.
Synthesize Information: Combine insights from the most credible and relevant sources to form a comprehensive and detailed answer.
Cite Sources: Where necessary, cite the sources in your response to support your statements.

Output:
Provide a clear, concise, and well-reasoned answer to the user query based on the information from the web search results.
Ensure the answer is suitable for someone seeking a scholarly explanation.";

/// Writes the final cited answer from the query and the serialized results.
pub trait AnswerProvider {
    /// Which model writes the answer; reported alongside it.
    fn provider(&self) -> Provider;

    async fn synthesize(&self, query: &str, web_results: &str) -> Result<String, LlmError>;
}

/// Query and results travel in the user turn; the instruction stays fixed.
impl AnswerProvider for ClaudeClient {
    fn provider(&self) -> Provider {
        Provider::Claude
    }

    async fn synthesize(&self, query: &str, web_results: &str) -> Result<String, LlmError> {
        let system = format!("{SCHOLAR_ROLE}\n\n{SCHOLAR_INSTRUCTIONS}");
        let user = format!("User query: {query}\nWeb results from the internet: {web_results}");
        self.complete(Prompt {
            system: &system,
            user: &user,
            max_tokens: Some(CLAUDE_MAX_TOKENS),
        })
        .await
    }
}

/// Query and results are embedded in the system instruction; the user turn
/// repeats the bare query.
impl AnswerProvider for MistralClient {
    fn provider(&self) -> Provider {
        Provider::Mistral
    }

    async fn synthesize(&self, query: &str, web_results: &str) -> Result<String, LlmError> {
        let system = format!(
            "{SCHOLAR_ROLE}\n\nUser query: {query}\nWeb results from the internet: {web_results}\n\n{SCHOLAR_INSTRUCTIONS}"
        );
        self.complete(Prompt {
            system: &system,
            user: query,
            max_tokens: None,
        })
        .await
    }
}

/// The provider picked for this run. No fallback between the two.
pub enum Answerer<'a, C = ClaudeClient, M = MistralClient> {
    Claude(&'a C),
    Mistral(&'a M),
}

impl<'a, C, M> Answerer<'a, C, M> {
    pub fn select(provider: Provider, claude: &'a C, mistral: &'a M) -> Self {
        match provider {
            Provider::Claude => Answerer::Claude(claude),
            Provider::Mistral => Answerer::Mistral(mistral),
        }
    }
}

impl<C: AnswerProvider, M: AnswerProvider> AnswerProvider for Answerer<'_, C, M> {
    fn provider(&self) -> Provider {
        match self {
            Answerer::Claude(_) => Provider::Claude,
            Answerer::Mistral(_) => Provider::Mistral,
        }
    }

    async fn synthesize(&self, query: &str, web_results: &str) -> Result<String, LlmError> {
        match self {
            Answerer::Claude(c) => c.synthesize(query, web_results).await,
            Answerer::Mistral(m) => m.synthesize(query, web_results).await,
        }
    }
}

/// Provider-agnostic listing of the aggregated results, one JSON object each.
pub fn serialize_results(results: &[SearchResult]) -> Result<String, serde_json::Error> {
    let listing = serde_json::to_string_pretty(results)?;
    debug!(results = results.len(), bytes = listing.len(), "serialized results");
    Ok(listing)
}
