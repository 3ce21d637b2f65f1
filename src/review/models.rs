//! Data models for the review schedule

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How urgently a result should be reviewed.
/// Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(label)
    }
}

/// When one completed test result should be revisited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewScheduleEntry {
    /// Stage index the result refers to
    pub step_id: usize,
    pub next_review: DateTime<Utc>,
    /// Preview of the stage content
    pub topic: String,
    pub importance: Importance,
}

impl ReviewScheduleEntry {
    /// Check if the review is due
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_review
    }
}
