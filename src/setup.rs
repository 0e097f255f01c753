//! setup.rs
//!
//! The persistence layer: a durable string-to-string store addressed by
//! string keys, playing the part browser local storage plays for a web
//! front end. Values never expire.
//!
//! # Overview
//!
//! - **`KeyValueStore`**: `get`, `set` and `remove` over whole string
//!   values. Each call is atomic for its single key and nothing more.
//! - **`MemoryStore`**: A process-local store. Clones share the same map,
//!   which lets the completion store and the preferences sit on one
//!   instance.
//! - **`FileStore`**: Keeps the whole map as one JSON object in a file and
//!   rewrites it through [`crate::fileio::do_write`] on every change.
//!
//! The keys the application uses are collected as constants here so
//! nothing else spells them out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{StoreError, StoreResult};
use crate::fileio;

/// Display-language preference.
pub const LANGUAGE_KEY: &str = "nowruz-language";
/// Completion record, a JSON object of day numbers to `true`.
pub const COMPLETED_DAYS_KEY: &str = "nowruz-completed-days";
/// Active task-list identifier preference.
pub const TASK_LIST_KEY: &str = "nowruz-tasklist";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store. Cloning yields a handle onto the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: a single JSON object of string keys to string values.
///
/// A missing file reads as an empty store. The file is read on every call,
/// so several handles on the same path stay consistent.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        match fileio::do_read(&self.path)? {
            Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(&text)?),
            _ => Ok(BTreeMap::new()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let text = serde_json::to_string_pretty(entries)?;
        fileio::do_write(&self.path, &text)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    fn exercise<S: KeyValueStore>(store: S) {
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        // removing an absent key is fine
        store.remove("k").unwrap();
    }

    #[test]
    fn test_memory_store() {
        exercise(MemoryStore::new());
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set(LANGUAGE_KEY, "fa").unwrap();
        assert_eq!(b.get(LANGUAGE_KEY).unwrap().as_deref(), Some("fa"));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_file_store() {
        let dir = TempDir::new().unwrap();
        exercise(FileStore::new(dir.child("state.json")));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("state.json");
        FileStore::new(&path).set(TASK_LIST_KEY, "custom").unwrap();
        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get(TASK_LIST_KEY).unwrap().as_deref(),
            Some("custom")
        );
    }

    #[test]
    fn test_file_store_reports_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("state.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_shared_reference_is_a_store() {
        let store = MemoryStore::new();
        exercise(&store);
        exercise(Arc::new(MemoryStore::new()));
    }
}
