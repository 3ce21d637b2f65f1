//! Derived performance snapshots (computed, never stored)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum labels kept in any ranked list
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Mean quiz score, 0 without results
    pub average_score: f64,
    /// Most frequently missed labels, most frequent first
    pub weak_areas: Vec<String>,
    /// Minutes between the first and last timestamped stage
    pub study_time: i64,
    pub notes_analysis: NoteAnalysis,
    pub recommended_review: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAnalysis {
    pub common_tags: Vec<String>,
    /// "YYYY-MM-DD" -> notes written that day
    pub notes_per_day: BTreeMap<String, usize>,
    pub total_notes: usize,
}

/// One point of the score-over-time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePoint {
    pub name: String,
    pub score: f64,
}
