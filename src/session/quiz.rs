//! Quiz grading and session progress

use chrono::{DateTime, Utc};

use super::models::{Question, Session, TestResult};
use crate::errors::{EngineError, EngineResult};

/// Grade a finished quiz.
///
/// `answers[i]` is the option picked for `questions[i]`; a missing answer
/// counts as wrong. Incorrect answers are labelled by question text.
pub fn grade_quiz(
    questions: &[Question],
    answers: &[usize],
    step_id: usize,
    completed_at: DateTime<Utc>,
) -> EngineResult<TestResult> {
    if questions.is_empty() {
        return Err(EngineError::InvalidInput("cannot grade an empty quiz".to_string()));
    }

    let mut incorrect_answers = Vec::new();
    let mut correct = 0usize;
    for (idx, question) in questions.iter().enumerate() {
        if answers.get(idx) == Some(&question.correct_answer) {
            correct += 1;
        } else {
            incorrect_answers.push(question.question.clone());
        }
    }

    Ok(TestResult {
        step_id,
        score: correct as f64 / questions.len() as f64 * 100.0,
        completed_at,
        incorrect_answers,
    })
}

/// Progress after recording `new_result`: the share of stages already
/// completed before this result, weighted by the running mean score.
pub fn calculate_progress(session: &Session, new_result: &TestResult) -> u32 {
    let total_stages = session.history.len();
    if total_stages == 0 {
        return 0;
    }

    let previous = session.test_results.as_deref().unwrap_or_default();
    let completed = previous.len();
    let score_sum: f64 = previous.iter().map(|r| r.score).sum::<f64>() + new_result.score;
    let average = score_sum / (completed + 1) as f64;

    let progress = (completed as f64 / total_stages as f64 * average).round();
    progress.clamp(0.0, 100.0) as u32
}
