//! Review plans built from a session's test results

use chrono::{DateTime, Utc};

use super::algorithm::{calculate_importance, calculate_next_review};
use super::models::ReviewScheduleEntry;
use crate::errors::{EngineError, EngineResult};
use crate::session::Session;

/// Characters of stage content kept in a schedule entry's topic
pub const TOPIC_PREVIEW_CHARS: usize = 100;

/// Shorten stage content for display, marking truncation with "..."
pub fn topic_preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TOPIC_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// One entry per test result, in result order.
///
/// A result's position in `test_results` is its repetition index; its
/// `step_id` only selects which stage's content labels the entry.
pub fn generate_review_schedule(session: &Session) -> EngineResult<Vec<ReviewScheduleEntry>> {
    session
        .results()?
        .iter()
        .enumerate()
        .map(|(repetition_index, result)| {
            let stage = session.history.get(result.step_id).ok_or_else(|| {
                EngineError::InvalidInput(format!(
                    "test result {} refers to stage index {} but the session has {} stages",
                    repetition_index,
                    result.step_id,
                    session.history.len()
                ))
            })?;

            Ok(ReviewScheduleEntry {
                step_id: result.step_id,
                next_review: calculate_next_review(
                    repetition_index,
                    result.completed_at,
                    result.score,
                ),
                topic: topic_preview(&stage.content),
                importance: calculate_importance(result.score),
            })
        })
        .collect()
}

/// Entries due at `now`, soonest first; equal dates put higher importance first
pub fn due_reviews(
    schedule: &[ReviewScheduleEntry],
    now: DateTime<Utc>,
) -> Vec<ReviewScheduleEntry> {
    let mut due: Vec<ReviewScheduleEntry> = schedule
        .iter()
        .filter(|entry| entry.is_due(now))
        .cloned()
        .collect();
    due.sort_by(|a, b| {
        a.next_review
            .cmp(&b.next_review)
            .then_with(|| b.importance.cmp(&a.importance))
    });
    due
}
