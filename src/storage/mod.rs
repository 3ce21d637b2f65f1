//! Persistence adapters
//!
//! The engine itself never decides when to persist. These adapters give the
//! controller (and the cache's archive path) a key-value store to work with.

mod kv_store;
mod sessions;

pub use kv_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Result, StorageError};
pub use sessions::SessionStorage;
