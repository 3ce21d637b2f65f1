use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use studyflow_lib::config::EngineConfig;
use studyflow_lib::session::Session;
use studyflow_lib::storage::{FileKeyValueStore, SessionStorage};

/// Shared application state for CLI commands
pub struct App {
    pub sessions: SessionStorage<FileKeyValueStore>,
}

impl App {
    /// Load config, then open the file store (flag beats config beats default)
    pub fn new(data_dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => match default_config_path() {
                Some(path) => EngineConfig::load_or_default(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => EngineConfig::default(),
            },
        };

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config
                .resolve_data_dir()
                .context("Failed to get data directory")?,
        };
        log::debug!("Using data directory {:?}", data_dir);

        let store = FileKeyValueStore::new(data_dir).context("Failed to open data directory")?;

        Ok(Self {
            sessions: SessionStorage::new(store),
        })
    }

    /// Resolve a session argument: a path to a JSON file, "latest", or a stored ID
    pub fn resolve_session(&self, arg: &str) -> Result<Session> {
        let path = Path::new(arg);
        if path.extension().map_or(false, |ext| ext == "json") && path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse session {}", path.display()));
        }

        if arg.eq_ignore_ascii_case("latest") {
            return self
                .sessions
                .latest_session()
                .context("Failed to list sessions")?
                .context("No stored sessions");
        }

        self.sessions
            .get_session(arg)
            .with_context(|| format!("Session '{}' not found", arg))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("studyflow").join("config.toml"))
}
