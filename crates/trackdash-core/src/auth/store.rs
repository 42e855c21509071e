// ── Persisted session marker storage ──

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The marker written on login. Never contains the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    pub is_authenticated: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Where the session marker lives.
///
/// `load` returns `Ok(None)` when no marker exists and an error when one
/// exists but cannot be read or parsed.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<PersistedAuth>, CoreError>;
    fn save(&self, marker: &PersistedAuth) -> Result<(), CoreError>;
    /// Remove the marker. Removing an absent marker succeeds.
    fn clear(&self) -> Result<(), CoreError>;
}

// ── File store ───────────────────────────────────────────────────────

/// JSON file on disk, one marker per file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<PersistedAuth>, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CoreError::storage(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CoreError::storage(format!("corrupt session marker: {e}")))
    }

    fn save(&self, marker: &PersistedAuth) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(marker)
            .map_err(|e| CoreError::storage(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| CoreError::storage(format!("cannot write {}: {e}", self.path.display())))
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::storage(format!(
                "cannot remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

// ── Memory store ─────────────────────────────────────────────────────

/// Process-local store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<PersistedAuth>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing marker.
    pub fn with_marker(marker: PersistedAuth) -> Self {
        Self {
            slot: Mutex::new(Some(marker)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<PersistedAuth>, CoreError> {
        self.slot
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| CoreError::storage("session store lock poisoned"))
    }

    fn save(&self, marker: &PersistedAuth) -> Result<(), CoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        *slot = Some(marker.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}
