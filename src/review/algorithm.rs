//! Performance-adjusted spaced repetition
//!
//! A fixed ladder of base intervals indexed by how many times the material
//! has come up, stretched or shrunk by the quiz score:
//!
//! - score < 70: half the interval (struggling, review sooner)
//! - score > 90: one and a half times the interval (mastered)
//! - otherwise: unchanged

use chrono::{DateTime, Duration, Utc};

use super::models::Importance;

/// Base review intervals in days, by repetition index
pub const BASE_INTERVALS: [i64; 5] = [1, 3, 7, 14, 30];

/// Base interval for a repetition index. The ladder does not grow past
/// its last rung.
pub fn base_interval(repetition_index: usize) -> i64 {
    BASE_INTERVALS
        .get(repetition_index)
        .copied()
        .unwrap_or(BASE_INTERVALS[BASE_INTERVALS.len() - 1])
}

/// Multiplier applied to the base interval for a quiz score
pub fn performance_multiplier(score: f64) -> f64 {
    if score < 70.0 {
        0.5
    } else if score > 90.0 {
        1.5
    } else {
        1.0
    }
}

/// Adjusted interval in whole days
pub fn review_interval_days(repetition_index: usize, score: f64) -> i64 {
    let adjusted = base_interval(repetition_index) as f64 * performance_multiplier(score);
    adjusted.round() as i64
}

/// Calculate the next review date
///
/// # Arguments
/// * `repetition_index` - Zero-based count of previous repetitions
/// * `last_review_date` - When the material was last reviewed
/// * `score` - Quiz score (0-100) from that review
///
/// Dates past the representable range saturate at `DateTime::<Utc>::MAX_UTC`.
pub fn calculate_next_review(
    repetition_index: usize,
    last_review_date: DateTime<Utc>,
    score: f64,
) -> DateTime<Utc> {
    last_review_date
        .checked_add_signed(Duration::days(review_interval_days(repetition_index, score)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Three-bucket triage of a quiz score
pub fn calculate_importance(score: f64) -> Importance {
    if score < 70.0 {
        Importance::High
    } else if score < 85.0 {
        Importance::Medium
    } else {
        Importance::Low
    }
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i64) -> String {
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
