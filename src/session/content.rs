//! Boundary parsing for generated stage content
//!
//! The generator returns loosely structured JSON text. It is sanitized,
//! parsed and validated here once, so everything past this point works
//! with a [`GeneratedContent`] that is known to be well formed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::Question;
use crate::errors::{EngineError, EngineResult};

/// Validated content for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub content: String,
    pub summary: String,
    pub quiz: Vec<Question>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practical_task: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContent {
    content: Option<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    quiz: Vec<RawQuestion>,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    practical_task: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default)]
    id: Option<String>,
    question: String,
    options: Vec<String>,
    correct_answer: i64,
    #[serde(default)]
    explanation: String,
}

/// Strip ASCII control characters (U+0000..=U+001F and U+007F)
pub fn sanitize_control_chars(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(*c as u32, 0x00..=0x1F | 0x7F)).collect()
}

/// Drop a surrounding markdown code fence (```json ... ```), if any
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    let rest = rest.trim_start();
    rest.strip_prefix("json").unwrap_or(rest).trim()
}

/// Parse and validate raw generator output
pub fn parse_generated_content(raw: &str) -> EngineResult<GeneratedContent> {
    // Fence removal first: the sanitizer also strips the newline that
    // separates the fence tag from the payload.
    let sanitized = sanitize_control_chars(strip_code_fence(raw));
    let parsed: RawContent = serde_json::from_str(&sanitized)
        .map_err(|e| EngineError::InvalidContent(format!("not valid JSON: {}", e)))?;

    let content = parsed
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| EngineError::InvalidContent("missing content".to_string()))?;

    let quiz = parsed
        .quiz
        .into_iter()
        .enumerate()
        .map(|(idx, q)| validate_question(idx, q))
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(GeneratedContent {
        content,
        summary: parsed.summary,
        quiz,
        key_points: parsed.key_points,
        practical_task: parsed.practical_task.filter(|t| !t.trim().is_empty()),
    })
}

fn validate_question(idx: usize, raw: RawQuestion) -> EngineResult<Question> {
    if raw.options.len() < 2 {
        return Err(EngineError::InvalidContent(format!(
            "question {} has {} options, need at least 2",
            idx + 1,
            raw.options.len()
        )));
    }
    let correct_answer = usize::try_from(raw.correct_answer)
        .ok()
        .filter(|i| *i < raw.options.len())
        .ok_or_else(|| {
            EngineError::InvalidContent(format!(
                "question {} has correct answer {} outside its {} options",
                idx + 1,
                raw.correct_answer,
                raw.options.len()
            ))
        })?;

    Ok(Question {
        id: raw
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        question: raw.question,
        options: raw.options,
        correct_answer,
        explanation: raw.explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "content": "Borrowing lets you reference data without taking ownership.",
        "summary": "References borrow",
        "quiz": [
            {
                "question": "What does & create?",
                "options": ["A copy", "A reference", "A box", "A thread"],
                "correctAnswer": 1,
                "explanation": "& creates a shared reference"
            }
        ],
        "keyPoints": ["shared refs", "mutable refs"],
        "practicalTask": "Write a function taking &str"
    }"#;

    #[test]
    fn test_parse_valid_payload() {
        let parsed = parse_generated_content(PAYLOAD).unwrap();

        assert!(parsed.content.starts_with("Borrowing"));
        assert_eq!(parsed.quiz.len(), 1);
        assert_eq!(parsed.quiz[0].correct_answer, 1);
        assert!(!parsed.quiz[0].id.is_empty());
        assert_eq!(parsed.key_points.len(), 2);
        assert_eq!(parsed.practical_task.as_deref(), Some("Write a function taking &str"));
    }

    #[test]
    fn test_parse_fenced_payload_with_control_chars() {
        let raw = format!("```json\n{}\n```", PAYLOAD.replace("Borrowing", "Borrow\u{7}ing"));
        let parsed = parse_generated_content(&raw).unwrap();
        assert!(parsed.content.starts_with("Borrowing"));
    }

    #[test]
    fn test_reject_out_of_range_answer() {
        let raw = r#"{"content": "x", "quiz": [
            {"question": "q", "options": ["a", "b"], "correctAnswer": 2}
        ]}"#;
        assert!(matches!(
            parse_generated_content(raw),
            Err(EngineError::InvalidContent(_))
        ));

        let negative = r#"{"content": "x", "quiz": [
            {"question": "q", "options": ["a", "b"], "correctAnswer": -1}
        ]}"#;
        assert!(parse_generated_content(negative).is_err());
    }

    #[test]
    fn test_reject_single_option_question() {
        let raw = r#"{"content": "x", "quiz": [
            {"question": "q", "options": ["only"], "correctAnswer": 0}
        ]}"#;
        assert!(matches!(
            parse_generated_content(raw),
            Err(EngineError::InvalidContent(_))
        ));
    }

    #[test]
    fn test_reject_missing_content_and_garbage() {
        assert!(parse_generated_content(r#"{"summary": "s"}"#).is_err());
        assert!(parse_generated_content(r#"{"content": "   "}"#).is_err());
        assert!(parse_generated_content("Sorry, I cannot help with that").is_err());
    }
}
