//! The key/value persistence surface.
//!
//! Browser storage, files, memory: the session store only sees this trait,
//! so tests and embeddings inject whichever backing they need.

use hearth_core::{HearthError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Synchronous, string-valued key/value storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent or the
    /// store is unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value. A failure (quota exceeded, storage disabled) is
    /// reported to the caller, who degrades to in-memory state.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Purely in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| HearthError::persistence("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one file per key under a base directory.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `base_dir`, creating the directory if
    /// needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Creates a store at the default location (`<data dir>/hearth`).
    pub fn default_location() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| HearthError::persistence("Failed to determine data directory"))?;
        Self::new(data_dir.join("hearth"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are fixed widget-defined names, never user input.
        self.base_dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.key_path(key), value)
            .map_err(|e| HearthError::persistence(format!("Failed to write '{}': {}", key, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Some("v".to_string()));

        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k"), Some("v2".to_string()));
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();

        assert_eq!(store.get("chatbot_session_id"), None);
        store.set("chatbot_session_id", "abc").unwrap();
        assert_eq!(store.get("chatbot_session_id"), Some("abc".to_string()));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileStore::new(temp_dir.path()).unwrap();
            store.set("k", "persisted").unwrap();
        }
        let store = FileStore::new(temp_dir.path()).unwrap();
        assert_eq!(store.get("k"), Some("persisted".to_string()));
    }
}
