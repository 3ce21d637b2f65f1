//! Engine configuration (TOML)
//!
//! ```toml
//! data_dir = "/home/me/.local/share/studyflow"
//!
//! [cache]
//! content_ttl_seconds = 3600
//!
//! [rate_limit]
//! window_ms = 60000
//! max_requests = 10
//! ```
//!
//! Every field is optional; missing values take the defaults above.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::RateLimiter;
use crate::errors::{EngineError, EngineResult};
use crate::storage::{FileKeyValueStore, StorageError};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Where the file store keeps its documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_content_ttl")]
    pub content_ttl_seconds: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            content_ttl_seconds: default_content_ttl(),
        }
    }
}

fn default_content_ttl() -> i64 {
    3600
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
        }
    }
}

fn default_window_ms() -> i64 {
    60_000
}

fn default_max_requests() -> u32 {
    10
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| EngineError::InvalidInput(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path).map_err(StorageError::from)?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> EngineResult<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.rate_limit.max_requests == 0 {
            return Err(EngineError::InvalidInput(
                "rate_limit.max_requests must be > 0".to_string(),
            ));
        }
        if self.rate_limit.window_ms < 0 {
            return Err(EngineError::InvalidInput(
                "rate_limit.window_ms must be >= 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.rate_limit.window_ms, self.rate_limit.max_requests)
    }

    /// Configured data directory, or the platform default
    pub fn resolve_data_dir(&self) -> EngineResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(FileKeyValueStore::default_data_dir()?),
        }
    }
}
