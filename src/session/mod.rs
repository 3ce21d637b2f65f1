//! Study session data model
//!
//! This module provides:
//! - Session, stage, quiz, note and test-result models
//! - Parsing and validation of generated stage content
//! - Quiz grading and progress calculation

pub mod content;
pub mod models;
pub mod quiz;

pub use content::{parse_generated_content, sanitize_control_chars, GeneratedContent};
pub use models::*;
pub use quiz::{calculate_progress, grade_quiz};
