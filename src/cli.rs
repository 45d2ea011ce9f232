use clap::Parser;

use crate::llm::Provider;
use crate::research::AggregateOptions;
use crate::research::aggregate::DEFAULT_PER_QUESTION;

/// Research a question: expand it, search Google Scholar, and synthesize a cited answer.
///
/// Requires SERPAPI_API_KEY, ANTHROPIC_API_KEY, AZURE_AI_ENDPOINT and
/// AZURE_AI_API_KEY (read from the environment or a `.env` file).
#[derive(Parser, Debug)]
#[command(name = "scholar", version)]
pub struct Cli {
    /// Research query
    #[arg(value_parser = non_blank)]
    pub query: String,

    /// Model that writes the final answer
    #[arg(long, value_enum, default_value_t = Provider::Claude)]
    pub provider: Provider,

    /// Also show research areas, related questions and sources
    #[arg(long)]
    pub details: bool,

    /// Print the full run report as JSON
    #[arg(long, conflicts_with = "details")]
    pub json: bool,

    /// Scholar searches in flight at once (1 = sequential)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub concurrency: u8,

    /// Send padded empty questions to the search provider instead of skipping them
    #[arg(long)]
    pub search_blank_questions: bool,
}

impl Cli {
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            per_question: DEFAULT_PER_QUESTION,
            concurrency: usize::from(self.concurrency),
            skip_blank: !self.search_blank_questions,
        }
    }
}

fn non_blank(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("query must not be empty".to_string())
    } else {
        Ok(s.trim().to_string())
    }
}
