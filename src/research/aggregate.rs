use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::scholar::{ScholarSearch, SearchError, SearchResult};

pub const DEFAULT_PER_QUESTION: usize = 3;
pub const DEFAULT_CONCURRENCY: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    /// Results requested for each question.
    pub per_question: usize,
    /// Scholar searches allowed in flight at once. 1 = strictly sequential.
    pub concurrency: usize,
    /// Skip blank (padded) questions instead of searching for them.
    pub skip_blank: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            per_question: DEFAULT_PER_QUESTION,
            concurrency: DEFAULT_CONCURRENCY,
            skip_blank: true,
        }
    }
}

/// A search failure tagged with the 1-based question it belonged to.
#[derive(Debug, thiserror::Error)]
#[error("scholar search for question {index} failed: {source}")]
pub struct QuestionSearchError {
    pub index: usize,
    #[source]
    pub source: SearchError,
}

/// Search every question and concatenate the hits in question order.
///
/// Fails fast: the first failing question (in question order) aborts the
/// whole aggregation and no partial results are returned.
pub async fn aggregate(
    search: &impl ScholarSearch,
    questions: &[String],
    options: AggregateOptions,
) -> Result<Vec<SearchResult>, QuestionSearchError> {
    let per_question = options.per_question;
    let jobs = questions
        .iter()
        .enumerate()
        .filter(|(_, q)| !(options.skip_blank && q.trim().is_empty()));

    let blocks: Vec<Vec<SearchResult>> = stream::iter(jobs)
        .map(|(i, question)| async move {
            let hits = search
                .search(question, per_question)
                .await
                .map_err(|source| QuestionSearchError {
                    index: i + 1,
                    source,
                })?;
            debug!(question = i + 1, hits = hits.len(), "question searched");
            Ok::<_, QuestionSearchError>(hits)
        })
        .buffered(options.concurrency.max(1))
        .try_collect()
        .await?;

    Ok(blocks.into_iter().flatten().collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted scholar backend: `per_query` hits for each query, failing for
    /// any query listed in `fail_on`. Queries in `delays` answer late.
    pub(crate) struct MockScholar {
        pub per_query: usize,
        pub fail_on: Vec<String>,
        pub overrides: HashMap<String, usize>,
        pub delays: HashMap<String, u64>,
        pub queries: Mutex<Vec<String>>,
        pub finished: Mutex<Vec<String>>,
    }

    impl MockScholar {
        pub(crate) fn returning(per_query: usize) -> Self {
            Self {
                per_query,
                fail_on: Vec::new(),
                overrides: HashMap::new(),
                delays: HashMap::new(),
                queries: Mutex::new(Vec::new()),
                finished: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing_on(mut self, query: &str) -> Self {
            self.fail_on.push(query.to_string());
            self
        }

        pub(crate) fn with_count(mut self, query: &str, n: usize) -> Self {
            self.overrides.insert(query.to_string(), n);
            self
        }

        pub(crate) fn with_delay(mut self, query: &str, millis: u64) -> Self {
            self.delays.insert(query.to_string(), millis);
            self
        }

        pub(crate) fn captured_queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }

        /// Queries in the order their responses arrived.
        pub(crate) fn finish_order(&self) -> Vec<String> {
            self.finished.lock().unwrap().clone()
        }
    }

    pub(crate) fn hit(query: &str, n: usize) -> SearchResult {
        SearchResult {
            title: format!("{query} #{n}"),
            snippet: format!("snippet for {query}"),
            link: format!("https://papers.example/{}/{n}", query.replace(' ', "-")),
            source: "Journal, 2024".into(),
            date: "Journal, 2024".into(),
            citations: n as u64,
        }
    }

    impl ScholarSearch for MockScholar {
        async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            if let Some(&millis) = self.delays.get(query) {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
            self.finished.lock().unwrap().push(query.to_string());
            if self.fail_on.iter().any(|q| q == query) {
                return Err(SearchError::Api {
                    code: 500,
                    message: format!("backend failure for {query}"),
                });
            }
            let n = self.overrides.get(query).copied().unwrap_or(self.per_query);
            Ok((0..n.min(limit)).map(|i| hit(query, i)).collect())
        }
    }

    fn questions(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn concatenates_in_question_order() {
        let mock = MockScholar::returning(2);
        let qs = questions(&["alpha", "beta", "gamma"]);

        let results = aggregate(&mock, &qs, AggregateOptions::default()).await.unwrap();

        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            ["alpha #0", "alpha #1", "beta #0", "beta #1", "gamma #0", "gamma #1"]
        );
    }

    #[tokio::test]
    async fn length_is_sum_of_per_question_counts() {
        let mock = MockScholar::returning(3)
            .with_count("alpha", 1)
            .with_count("beta", 0);
        let qs = questions(&["alpha", "beta", "gamma"]);

        let results = aggregate(&mock, &qs, AggregateOptions::default()).await.unwrap();

        assert_eq!(results.len(), 1 + 0 + 3);
    }

    #[tokio::test]
    async fn reordering_questions_reorders_blocks() {
        let mock = MockScholar::returning(2);
        let forward = aggregate(&mock, &questions(&["a", "b"]), AggregateOptions::default())
            .await
            .unwrap();
        let reversed = aggregate(&mock, &questions(&["b", "a"]), AggregateOptions::default())
            .await
            .unwrap();

        assert_eq!(forward[..2], reversed[2..]);
        assert_eq!(forward[2..], reversed[..2]);
    }

    #[tokio::test]
    async fn caps_results_per_question() {
        let mock = MockScholar::returning(10);
        let options = AggregateOptions {
            per_question: 3,
            ..AggregateOptions::default()
        };

        let results = aggregate(&mock, &questions(&["x", "y"]), options).await.unwrap();

        assert_eq!(results.len(), 6);
    }

    #[tokio::test]
    async fn blank_questions_skipped_by_default() {
        let mock = MockScholar::returning(1);
        let qs = questions(&["a", "", "  ", "b"]);

        let results = aggregate(&mock, &qs, AggregateOptions::default()).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(mock.captured_queries().len(), 2);
    }

    #[tokio::test]
    async fn blank_questions_searched_when_requested() {
        let mock = MockScholar::returning(1);
        let qs = questions(&["a", "", "b"]);
        let options = AggregateOptions {
            skip_blank: false,
            ..AggregateOptions::default()
        };

        let results = aggregate(&mock, &qs, options).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(mock.captured_queries(), ["a", "", "b"]);
    }

    #[tokio::test]
    async fn one_failure_aborts_everything() {
        let mock = MockScholar::returning(2).failing_on("q4");
        let qs: Vec<String> = (1..=9).map(|i| format!("q{i}")).collect();

        let err = aggregate(&mock, &qs, AggregateOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.index, 4);
        assert!(err.to_string().contains("question 4"));
    }

    #[tokio::test]
    async fn slow_first_question_keeps_its_place() {
        let mock = MockScholar::returning(1).with_delay("q1", 50);
        let qs = questions(&["q1", "q2", "q3"]);

        let results = aggregate(&mock, &qs, AggregateOptions::default()).await.unwrap();

        assert_eq!(mock.finish_order(), ["q2", "q3", "q1"]);
        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["q1 #0", "q2 #0", "q3 #0"]);
    }

    #[tokio::test]
    async fn fast_later_failure_still_aborts_behind_slow_question() {
        let mock = MockScholar::returning(1)
            .with_delay("q1", 50)
            .failing_on("q2");
        let qs = questions(&["q1", "q2", "q3"]);

        let err = aggregate(&mock, &qs, AggregateOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.index, 2);
    }

    #[tokio::test]
    async fn earliest_failing_question_is_reported_under_concurrency() {
        let mock = MockScholar::returning(1)
            .with_delay("q1", 50)
            .failing_on("q1")
            .failing_on("q3");
        let qs = questions(&["q1", "q2", "q3"]);

        let err = aggregate(&mock, &qs, AggregateOptions::default())
            .await
            .unwrap_err();

        assert_eq!(mock.finish_order().last().map(String::as_str), Some("q1"));
        assert_eq!(err.index, 1);
    }

    #[tokio::test]
    async fn sequential_mode_stops_at_failure() {
        let mock = MockScholar::returning(2).failing_on("q2");
        let qs = questions(&["q1", "q2", "q3"]);
        let options = AggregateOptions {
            concurrency: 1,
            ..AggregateOptions::default()
        };

        aggregate(&mock, &qs, options).await.unwrap_err();

        assert_eq!(mock.captured_queries(), ["q1", "q2"]);
    }
}
