use serde::Serialize;
use tracing::info;

use super::aggregate::{AggregateOptions, QuestionSearchError, aggregate};
use super::expand::{ExpansionError, ParseError, expand_query};
use super::related::generate_related;
use super::synthesize::{AnswerProvider, serialize_results};
use crate::llm::{ChatModel, LlmError, Provider};
use crate::scholar::{ScholarSearch, SearchResult};

/// Everything one run produced, intermediate artifacts included.
#[derive(Debug, Serialize)]
pub struct ResearchReport {
    pub query: String,
    pub provider: Provider,
    pub research_areas: Vec<String>,
    pub related_questions: Vec<String>,
    pub results: Vec<SearchResult>,
    pub answer: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("query expansion request failed: {0}")]
    ExpansionCall(LlmError),

    #[error("could not parse research areas: {0}")]
    ExpansionParse(ParseError),

    #[error("related question generation failed: {0}")]
    Generation(LlmError),

    #[error("{0}")]
    Search(#[from] QuestionSearchError),

    #[error("could not serialize search results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{} answer synthesis failed: {source}", .provider.display_name())]
    Synthesis {
        provider: Provider,
        #[source]
        source: LlmError,
    },
}

impl From<ExpansionError> for ResearchError {
    fn from(e: ExpansionError) -> Self {
        match e {
            ExpansionError::Call(e) => ResearchError::ExpansionCall(e),
            ExpansionError::Parse(e) => ResearchError::ExpansionParse(e),
        }
    }
}

/// The four pipeline stages wired to their collaborators.
///
/// `expander` writes the research areas, `generator` the related questions,
/// `search` retrieves scholar hits and `answerer` writes the final answer.
/// Stages run strictly one after another; any failure aborts the run.
pub struct Research<'a, X, G, S, A> {
    pub expander: &'a X,
    pub generator: &'a G,
    pub search: &'a S,
    pub answerer: &'a A,
    pub options: AggregateOptions,
}

impl<X, G, S, A> Research<'_, X, G, S, A>
where
    X: ChatModel,
    G: ChatModel,
    S: ScholarSearch,
    A: AnswerProvider,
{
    pub async fn run(&self, query: &str) -> Result<ResearchReport, ResearchError> {
        info!("generating research areas");
        let research_areas = expand_query(self.expander, query).await?;

        info!("generating related questions");
        let related_questions = generate_related(self.generator, &research_areas)
            .await
            .map_err(ResearchError::Generation)?;

        info!(
            questions = related_questions.len(),
            concurrency = self.options.concurrency,
            "fetching Google Scholar results"
        );
        let results = aggregate(self.search, &related_questions, self.options).await?;

        let provider = self.answerer.provider();
        info!(
            results = results.len(),
            provider = provider.display_name(),
            "synthesizing answer"
        );
        let web_results = serialize_results(&results)?;
        let answer = self
            .answerer
            .synthesize(query, &web_results)
            .await
            .map_err(|source| ResearchError::Synthesis { provider, source })?;

        Ok(ResearchReport {
            query: query.to_string(),
            provider,
            research_areas,
            related_questions,
            results,
            answer,
        })
    }
}
