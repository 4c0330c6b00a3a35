//! Key-value persistence
//!
//! The engine only needs a tiny byte-oriented store: one short record per key.
//! - `MemoryStore`: process-lifetime map, used by tests and as a fallback
//! - `JsonFileStore`: whole map written to a JSON file on every `set`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to write (or open) a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store rejected write for key '{0}'")]
    Rejected(String),
}

/// Byte-oriented key-value store
pub trait KvStore {
    /// Stored value, or `None` if the key is missing or unreadable
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    /// Store a value, replacing any previous one
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, for exercising the failure path
    pub fn read_only() -> Self {
        Self {
            entries: BTreeMap::new(),
            read_only: true,
        }
    }

    /// Insert without going through the write path
    pub fn with_entry(mut self, key: &str, value: &[u8]) -> Self {
        self.entries.insert(key.to_string(), value.to_vec());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Rejected(key.to_string()));
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// File-backed store; the whole map is rewritten on each `set`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Vec<u8>>,
}

impl JsonFileStore {
    /// Open a store file. A missing file starts empty; an unreadable one is
    /// logged and also starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(entries) => {
                    log::info!("Opened store {}", path.display());
                    entries
                }
                Err(e) => {
                    log::warn!("Store {} is corrupt ({}), starting fresh", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No store at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Cannot read store {} ({}), starting fresh", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        // Write to a sibling temp file, then rename over the real one
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_string(), value.to_vec());
        if let Err(e) = self.flush() {
            // Keep memory in step with disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tick-arcade-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", &[1, 2]).unwrap();
        assert_eq!(store.get("k"), Some(vec![1, 2]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_read_only_store_rejects() {
        let mut store = MemoryStore::read_only().with_entry("k", &[9]);
        assert!(matches!(store.set("k", &[1]), Err(StoreError::Rejected(_))));
        assert_eq!(store.get("k"), Some(vec![9]));
    }

    #[test]
    fn test_file_store_persists() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert!(store.get("snake_high_score").is_none());
        store.set("snake_high_score", &[7, 0]).unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("snake_high_score"), Some(vec![7, 0]));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_recovers_from_corruption() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::open(&path);
        assert!(store.get("anything").is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_write_failure_rolls_back() {
        let path = std::env::temp_dir()
            .join("tick-arcade-missing-dir")
            .join("nested")
            .join("store.json");
        let mut store = JsonFileStore::open(&path);
        assert!(matches!(store.set("k", &[1]), Err(StoreError::Io(_))));
        assert!(store.get("k").is_none());
    }
}
