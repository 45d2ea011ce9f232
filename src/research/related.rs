use tracing::{debug, warn};

use crate::llm::{ChatModel, LlmError, Prompt};

pub const RELATED_QUESTION_COUNT: usize = 9;

fn system_prompt(queries: &str) -> String {
    format!(
        "Given the set of 3 queries: {queries}, generate a set of related questions that dive deeper into the topic, aiming to uncover various aspects, perspectives, or details.
The generated questions should be relevant, clear, and designed to prompt further exploration or clarification on the topic.
Provide exactly 9 related questions, 3 for each of the given queries.

Format your response as a simple list of questions, one per line, without numbering or any other formatting."
    )
}

/// Ask the model for nine follow-up questions, three per research area.
///
/// Always returns exactly nine entries; see [`parse_related_questions`].
pub async fn generate_related(
    model: &impl ChatModel,
    research_areas: &[String],
) -> Result<Vec<String>, LlmError> {
    let joined = research_areas.join("\n");
    let system = system_prompt(&joined);
    let raw = model
        .complete(Prompt {
            system: &system,
            user: &joined,
            max_tokens: None,
        })
        .await?;
    debug!(chars = raw.len(), "related questions received");
    Ok(parse_related_questions(&raw))
}

/// One question per non-empty line, truncated or right-padded with empty
/// strings to exactly nine.
pub fn parse_related_questions(raw: &str) -> Vec<String> {
    let mut questions: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if questions.len() < RELATED_QUESTION_COUNT {
        warn!(
            got = questions.len(),
            "model returned fewer than 9 questions, padding with blanks"
        );
    }
    questions.resize(RELATED_QUESTION_COUNT, String::new());
    questions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> String {
        (1..=n)
            .map(|i| format!("  Question {i}?  "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn nine_lines_pass_through_trimmed() {
        let questions = parse_related_questions(&lines(9));
        assert_eq!(questions.len(), 9);
        assert_eq!(questions[0], "Question 1?");
        assert_eq!(questions[8], "Question 9?");
    }

    #[test]
    fn three_lines_are_padded() {
        let questions = parse_related_questions(&lines(3));
        assert_eq!(questions.len(), 9);
        assert_eq!(questions[2], "Question 3?");
        assert!(questions[3..].iter().all(String::is_empty));
    }

    #[test]
    fn fifteen_lines_are_truncated() {
        let questions = parse_related_questions(&lines(15));
        assert_eq!(questions.len(), 9);
        assert_eq!(questions[8], "Question 9?");
    }

    #[test]
    fn blank_lines_are_dropped_before_counting() {
        let raw = "Q1?\n\n   \nQ2?\r\nQ3?\n";
        let questions = parse_related_questions(raw);
        assert_eq!(&questions[..3], ["Q1?", "Q2?", "Q3?"]);
        assert_eq!(questions.len(), 9);
        assert!(questions[3..].iter().all(String::is_empty));
    }

    #[test]
    fn empty_response_is_nine_blanks() {
        let questions = parse_related_questions("");
        assert_eq!(questions, vec![String::new(); 9]);
    }

    #[test]
    fn prompt_embeds_queries() {
        let prompt = system_prompt("a\nb\nc");
        assert!(prompt.contains("queries: a\nb\nc,"));
        assert!(prompt.contains("exactly 9 related questions"));
    }
}
