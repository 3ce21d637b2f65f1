//! Spaced repetition review scheduling
//!
//! This module provides:
//! - Performance-adjusted interval ladder
//! - Importance triage of quiz scores
//! - Review plans and due-review selection for a session

pub mod algorithm;
pub mod models;
pub mod schedule;

pub use algorithm::{calculate_importance, calculate_next_review, format_interval, BASE_INTERVALS};
pub use models::*;
pub use schedule::{due_reviews, generate_review_schedule, topic_preview};
