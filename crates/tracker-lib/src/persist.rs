//! Snapshot persistence.
//!
//! The whole snapshot lives in one durable key-value slot as a JSON document.
//! Loading never fails: an absent, unreadable or structurally unusable value
//! falls back to the seed dataset. Saving never fails either from the caller's
//! point of view; write errors are logged and the in-memory snapshot stays
//! authoritative.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::{Result, TrackerError};
use crate::snapshot::Snapshot;

/// Key of the slot holding the application state.
pub const DEFAULT_STATE_KEY: &str = "tracker-state";

/// A durable key-value slot store.
pub trait Storage {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Slots stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing the slot `key`.
    #[must_use]
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TrackerError::Io(e)),
        }
    }

    /// Write-to-temp + rename, so a reader sees either the old or the new
    /// snapshot and never a torn one.
    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.slot_path(key);
        let tmp_path = path.with_extension("json.tmp");

        if let Err(e) = write_then_rename(&tmp_path, &path, value) {
            // A failed write or rename must not leave the temp file behind.
            let _ = fs::remove_file(&tmp_path);
            return Err(TrackerError::Io(e));
        }
        Ok(())
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(value.as_bytes())?;
    file.flush()?;
    drop(file);
    fs::rename(tmp_path, path)
}

/// Process-local slots; clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| TrackerError::Storage("memory slots poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| TrackerError::Storage("memory slots poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Encode a snapshot for the slot.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Decode a slot value into a snapshot.
///
/// The value must be a JSON object whose `projects` and `issues` are objects.
/// A value saved without a board order gets one rebuilt from its entities.
///
/// # Errors
///
/// Returns `InvalidSnapshot` for structurally unusable values and `Json` for
/// unparseable ones.
pub fn decode_snapshot(raw: &str) -> Result<Snapshot> {
    let value: Value = serde_json::from_str(raw)?;
    let Some(object) = value.as_object() else {
        return Err(TrackerError::InvalidSnapshot {
            reason: "top level is not an object".to_string(),
        });
    };
    for required in ["projects", "issues"] {
        if !object.get(required).is_some_and(Value::is_object) {
            return Err(TrackerError::InvalidSnapshot {
                reason: format!("missing '{required}' map"),
            });
        }
    }
    let has_board = object.contains_key("boardOrder");

    let mut snapshot: Snapshot = serde_json::from_value(value)?;
    if !has_board {
        tracing::info!("saved state has no board order; rebuilding it");
        snapshot.rebuild_board_order();
    }
    Ok(snapshot)
}

/// Loads and saves the snapshot through one fixed slot.
pub struct PersistencePort {
    storage: Box<dyn Storage>,
    key: String,
}

impl PersistencePort {
    /// Port over `storage` using [`DEFAULT_STATE_KEY`].
    #[must_use]
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self::with_key(storage, DEFAULT_STATE_KEY)
    }

    #[must_use]
    pub fn with_key(storage: impl Storage + 'static, key: impl Into<String>) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read and decode the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns the storage or decoding error; `Ok(None)` when the slot is empty.
    pub fn try_load(&self) -> Result<Option<Snapshot>> {
        match self.storage.read(&self.key)? {
            Some(raw) => decode_snapshot(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Load the saved snapshot, or `seed()` if there is none usable.
    pub fn load_or_seed(&self, seed: impl FnOnce() -> Snapshot) -> Snapshot {
        match self.try_load() {
            Ok(Some(snapshot)) => {
                tracing::debug!(key = %self.key, issues = snapshot.issues.len(), "loaded saved state");
                snapshot
            }
            Ok(None) => {
                tracing::info!(key = %self.key, "no saved state; using seed data");
                seed()
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "saved state unusable; using seed data");
                seed()
            }
        }
    }

    /// Encode and write `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns the encoding or storage error.
    pub fn try_save(&self, snapshot: &Snapshot) -> Result<()> {
        let raw = encode_snapshot(snapshot)?;
        self.storage.write(&self.key, &raw)
    }

    /// Save `snapshot`, logging and swallowing any failure.
    ///
    /// Returns whether the write succeeded.
    pub fn save(&self, snapshot: &Snapshot) -> bool {
        match self.try_save(snapshot) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to save state; keeping it in memory");
                false
            }
        }
    }
}

impl std::fmt::Debug for PersistencePort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistencePort")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
