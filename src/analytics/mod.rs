//! Progress analytics for study sessions

pub mod models;
pub mod progress;

pub use models::*;
pub use progress::{analyze_performance, optimization_hint, score_history};
