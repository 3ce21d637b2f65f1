//! Content caching for generated stages
//!
//! This module provides:
//! - A TTL cache with lazy eviction and an archive path into a key-value store
//! - A minimum-spacing rate limiter for generation calls
//! - A cache-first gate in front of the content generator

pub mod expiring;
pub mod gate;

pub use expiring::{archived_entries, content_cache_key, CacheEntry, ExpiringCache, ARCHIVE_KEY};
pub use gate::{ContentGate, ContentGenerator, ContentRequest, GateOutcome, RateLimiter};
