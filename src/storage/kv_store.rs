use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable key-value storage for sessions and the cache archive.
///
/// Values are whole JSON documents; `set` replaces the previous value.
pub trait KeyValueStore {
    /// All keys starting with `prefix`, in ascending order
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Remove every key
    fn clear(&self) -> Result<()>;
}

/// One pretty-printed JSON file per key
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("studyflow"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        if !self.base_path.exists() {
            return Ok(keys);
        }

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(key) = path.file_stem().and_then(|s| s.to_str()) {
                    if key.starts_with(prefix) {
                        keys.push(key.to_string());
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(Some(value))
    }

    /// Atomic write (write to .tmp then rename) so readers never see a
    /// half-written document
    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.key_path(key)?;
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        log::debug!("Wrote {:?}", path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for key in self.keys_with_prefix("")? {
            fs::remove_file(self.key_path(&key)?)?;
        }
        log::info!("Cleared store at {:?}", self.base_path);
        Ok(())
    }
}

/// In-memory store, used by tests and embedders that persist elsewhere
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Value>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.entries().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries().clear();
        Ok(())
    }
}
