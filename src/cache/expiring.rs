//! In-memory cache with per-entry expiry and an archive path

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::errors::EngineResult;
use crate::storage::KeyValueStore;

/// Store key holding the archive list
pub const ARCHIVE_KEY: &str = "archive";

/// A cached value and the instant it stops being served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Cache key for the content of one stage of a topic
pub fn content_cache_key(topic: &str, stage: u32) -> String {
    format!("{}-{}", topic, stage)
}

/// Key/value cache with lazy eviction: expired entries are dropped when
/// next read (or by [`ExpiringCache::purge_expired`]), not on a timer.
pub struct ExpiringCache<V, C = SystemClock> {
    entries: HashMap<String, CacheEntry<V>>,
    clock: C,
}

impl<V> ExpiringCache<V, SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V> Default for ExpiringCache<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C: Clock> ExpiringCache<V, C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Store `value` until now + `ttl_seconds`. Zero or negative TTLs are
    /// accepted and expire immediately.
    pub fn set(&mut self, key: &str, value: V, ttl_seconds: i64) {
        let now = self.clock.now();
        let ttl = Duration::milliseconds(ttl_seconds.saturating_mul(1000).max(-i64::MAX));
        let expires_at = now.checked_add_signed(ttl).unwrap_or(if ttl_seconds < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                value,
                expires_at,
            },
        );
    }

    /// Live value for `key`. An expired entry is evicted and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let now = self.clock.now();
        let expired = self.entries.get(key)?.is_expired(now);
        if expired {
            self.entries.remove(key);
            log::debug!("Evicted expired cache entry {}", key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries held, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry now; returns how many were removed
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }
}

impl<V: Serialize, C: Clock> ExpiringCache<V, C> {
    /// Move the entry for `key` (expired or not) onto the durable archive
    /// list in `store`. Returns `false` without touching the archive when
    /// the key is absent.
    ///
    /// The archive is read, appended to and written back as one document;
    /// callers sharing the store across threads must serialise calls.
    pub fn archive<S>(&mut self, key: &str, store: &S) -> EngineResult<bool>
    where
        S: KeyValueStore + ?Sized,
    {
        let Some(entry) = self.entries.get(key) else {
            return Ok(false);
        };

        let mut archive: Vec<Value> = match store.get(ARCHIVE_KEY)? {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };
        archive.push(serde_json::to_value(entry)?);
        store.set(ARCHIVE_KEY, &Value::Array(archive))?;

        // Only drop from memory once the archive write went through
        self.entries.remove(key);
        log::info!("Archived cache entry {}", key);
        Ok(true)
    }
}

/// Read back the archive list written by [`ExpiringCache::archive`]
pub fn archived_entries<V, S>(store: &S) -> EngineResult<Vec<CacheEntry<V>>>
where
    V: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(ARCHIVE_KEY)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryKeyValueStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn test_cache() -> ExpiringCache<String, FixedClock> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        ExpiringCache::with_clock(clock)
    }

    #[test]
    fn test_get_before_and_after_ttl() {
        let mut cache = test_cache();
        cache.set("k", "v".to_string(), 1);

        assert_eq!(cache.get("k").map(String::as_str), Some("v"));

        // Exactly at expiry is still live
        cache.clock().advance(Duration::seconds(1));
        assert!(cache.get("k").is_some());

        cache.clock().advance(Duration::milliseconds(1));
        assert!(cache.get("k").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_never_set_is_miss() {
        let mut cache = test_cache();
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut cache = test_cache();
        cache.set("k", "old".to_string(), 60);
        cache.set("k", "new".to_string(), 60);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").map(String::as_str), Some("new"));
    }

    #[test]
    fn test_non_positive_ttl_expires_immediately() {
        let mut cache = test_cache();
        cache.set("zero", "z".to_string(), 0);
        cache.set("negative", "n".to_string(), -5);

        // Zero TTL is live at the exact same instant
        assert!(cache.get("zero").is_some());
        assert!(cache.get("negative").is_none());

        cache.clock().advance(Duration::milliseconds(1));
        assert!(cache.get("zero").is_none());
    }

    #[test]
    fn test_extreme_ttl_does_not_overflow() {
        let mut cache = test_cache();
        cache.set("forever", "f".to_string(), i64::MAX);
        cache.set("never", "n".to_string(), i64::MIN);

        assert!(cache.get("forever").is_some());
        assert!(cache.get("never").is_none());
    }

    #[test]
    fn test_expired_entries_linger_until_read() {
        let mut cache = test_cache();
        cache.set("a", "1".to_string(), 1);
        cache.set("b", "2".to_string(), 100);
        cache.clock().advance(Duration::seconds(10));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = test_cache();
        cache.set("a", "1".to_string(), 100);
        cache.set("b", "2".to_string(), 100);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_archive_present_key() {
        let store = MemoryKeyValueStore::new();
        let mut cache = test_cache();
        cache.set("Rust-1", "stage one".to_string(), 3600);
        cache.set("Rust-2", "stage two".to_string(), 3600);

        assert!(cache.archive("Rust-1", &store).unwrap());
        assert!(cache.get("Rust-1").is_none());
        assert_eq!(cache.len(), 1);

        let archived: Vec<CacheEntry<String>> = archived_entries(&store).unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].key, "Rust-1");
        assert_eq!(archived[0].value, "stage one");

        assert!(cache.archive("Rust-2", &store).unwrap());
        let archived: Vec<CacheEntry<String>> = archived_entries(&store).unwrap();
        assert_eq!(archived.len(), 2);
        assert_eq!(archived[1].key, "Rust-2");
    }

    #[test]
    fn test_archive_ignores_expiry() {
        let store = MemoryKeyValueStore::new();
        let mut cache = test_cache();
        cache.set("old", "stale".to_string(), 1);
        cache.clock().advance(Duration::hours(1));

        assert!(cache.archive("old", &store).unwrap());
        assert_eq!(archived_entries::<String, _>(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_archive_absent_key_is_noop() {
        let store = MemoryKeyValueStore::new();
        let archived = json!([{"key": "x", "value": "y", "expiresAt": "2024-01-01T00:00:00Z"}]);
        store.set(ARCHIVE_KEY, &archived).unwrap();
        let mut cache = test_cache();

        assert!(!cache.archive("missing", &store).unwrap());
        assert_eq!(archived_entries::<String, _>(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_archive_rejects_corrupt_list() {
        let store = MemoryKeyValueStore::new();
        store.set(ARCHIVE_KEY, &json!({"not": "a list"})).unwrap();
        let mut cache = test_cache();
        cache.set("k", "v".to_string(), 60);

        assert!(cache.archive("k", &store).is_err());
        // Entry stays cached when the archive could not be written
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_content_cache_key() {
        assert_eq!(content_cache_key("Rust ownership", 3), "Rust ownership-3");
    }
}
