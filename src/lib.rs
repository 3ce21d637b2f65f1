//! Session analytics and adaptive review for AI-assisted study sessions.
//!
//! The controller owning a study session hands it to this crate to get
//! performance metrics ([`analytics`]) and a review plan ([`review`]), and
//! goes through the [`cache`] gate before asking for new stage content.
//! Nothing here persists on its own; [`storage`] offers adapters the
//! controller can use.

pub mod analytics;
pub mod cache;
pub mod clock;
pub mod config;
pub mod errors;
pub mod review;
pub mod session;
pub mod storage;

pub use errors::{EngineError, EngineResult};
