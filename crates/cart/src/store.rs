//! Persistent snapshot store.
//!
//! The cart is mirrored to an opaque string store under a fixed key - the
//! same contract the browser's local storage gives the web client. Two
//! implementations are provided: [`FileStore`] for durable on-disk state and
//! [`MemoryStore`] for tests and ephemeral sessions.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::instrument;

/// Errors from snapshot store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Synchronous opaque string storage, keyed.
///
/// `load` returns `None` when no value has ever been stored under `key`.
/// No transactionality is assumed beyond single-call atomicity.
pub trait SnapshotStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// =============================================================================
// FileStore
// =============================================================================

/// File-backed store: all keys live in one JSON object file.
///
/// Writes go to a temporary sibling file first and are moved into place with
/// a rename, so a crash mid-write leaves the previous snapshot intact.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store persisting to `path`. The file is created on first save.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> Result<HashMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        // A file we cannot parse is treated as empty; the next save rewrites
        // it wholesale.
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "store file unreadable, treating as empty");
                Ok(HashMap::new())
            }
        }
    }
}

impl SnapshotStore for FileStore {
    #[instrument(skip(self))]
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.remove(key))
    }

    #[instrument(skip(self, value))]
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());

        let encoded = serde_json::to_string_pretty(&map)
            .map_err(|e| StoreError::Io(io::Error::other(e)))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one key. Useful in tests.
    #[must_use]
    pub fn seeded(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load("cart").unwrap().is_none());

        store.save("cart", "[1,2,3]").unwrap();
        assert_eq!(store.load("cart").unwrap().as_deref(), Some("[1,2,3]"));

        store.save("cart", "[]").unwrap();
        assert_eq!(store.load("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_store_seeded() {
        let store = MemoryStore::seeded("cart", "[]");
        assert_eq!(store.load("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cart.json"));
        assert!(store.load("cart").unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cart.json"));

        store.save("cart", r#"[{"id":1}]"#).unwrap();
        assert_eq!(
            store.load("cart").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );

        // A fresh handle on the same path sees the persisted value.
        let reopened = FileStore::new(dir.path().join("cart.json"));
        assert_eq!(
            reopened.load("cart").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
    }

    #[test]
    fn test_file_store_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cart.json"));

        store.save("a", "one").unwrap();
        store.save("b", "two").unwrap();
        assert_eq!(store.load("a").unwrap().as_deref(), Some("one"));
        assert_eq!(store.load("b").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_file_store_garbage_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileStore::new(path);
        assert!(store.load("cart").unwrap().is_none());

        // Saving recovers the file.
        store.save("cart", "[]").unwrap();
        assert_eq!(store.load("cart").unwrap().as_deref(), Some("[]"));
    }
}
