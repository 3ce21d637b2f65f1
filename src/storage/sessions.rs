use super::kv_store::{KeyValueStore, Result, StorageError};
use crate::session::{Session, SESSION_KEY_PREFIX};

/// Session persistence on top of a [`KeyValueStore`]
/// (one `learning_session_<id>` document per session)
pub struct SessionStorage<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        let value = serde_json::to_value(session)?;
        self.store.set(&session.storage_key(), &value)
    }

    /// Load a session by ID
    pub fn get_session(&self, id: &str) -> Result<Session> {
        let key = format!("{}{}", SESSION_KEY_PREFIX, id);
        let value = self
            .store
            .get(&key)?
            .ok_or_else(|| StorageError::NotFound(format!("Session {} not found", id)))?;
        Ok(serde_json::from_value(value)?)
    }

    /// All readable sessions, most recently active first.
    /// Documents that fail to parse are skipped.
    pub fn list_sessions(&self) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();
        for key in self.store.keys_with_prefix(SESSION_KEY_PREFIX)? {
            let Some(value) = self.store.get(&key)? else {
                continue;
            };
            match serde_json::from_value::<Session>(value) {
                Ok(session) => sessions.push(session),
                Err(e) => log::warn!("Skipping unreadable session {}: {}", key, e),
            }
        }

        sessions.sort_by(|a, b| {
            b.last_api_call
                .cmp(&a.last_api_call)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(sessions)
    }

    /// The session to resume, if any
    pub fn latest_session(&self) -> Result<Option<Session>> {
        Ok(self.list_sessions()?.into_iter().next())
    }

    /// Drop everything in the underlying store
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }
}
