//! Core PlanStore implementation

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during store operations
///
/// A corrupted document is not an error: `load` discards it and reports
/// the key as absent.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The keyed document store
pub struct PlanStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl PlanStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        debug!(?base_path, "Opened plan store");
        Ok(Self { base_path })
    }

    /// Path of the document file backing a key
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    /// Load the document stored under a key
    ///
    /// Returns `None` when the key is absent. A document that fails to
    /// parse is removed and reported as absent, so a corrupted entry can
    /// never wedge the caller.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.key_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(%key, "load: key absent");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(%key, error = %e, "load: discarding corrupted document");
                fs::remove_file(&path)?;
                Ok(None)
            }
        }
    }

    /// Write the whole document for a key
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.key_path(key);
        let content = serde_json::to_string(value)?;
        fs::write(&path, content)?;
        debug!(%key, "save: document written");
        Ok(())
    }

    /// Raw document text for a key (for inspection tooling)
    pub fn raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a key and its document
    ///
    /// Removing an absent key is a no-op.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(%key, "delete: document removed");
        }
        Ok(())
    }

    /// List all stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        let doc = vec![Doc {
            name: "plan".to_string(),
            count: 3,
        }];
        store.save("docs", &doc).unwrap();

        let loaded: Option<Vec<Doc>> = store.load("docs").unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[test]
    fn test_load_absent_key() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        let loaded: Option<Vec<Doc>> = store.load("missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_corrupted_document_discards_it() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        let path = temp.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        let loaded: Option<Vec<Doc>> = store.load("bad").unwrap();
        assert!(loaded.is_none());
        assert!(!path.exists(), "corrupted document should be removed");
    }

    #[test]
    fn test_delete_and_keys() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        store.save("alpha", &vec![1, 2, 3]).unwrap();
        store.save("beta", &vec![4]).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["alpha", "beta"]);

        store.delete("alpha").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["beta"]);

        // Deleting an absent key is a no-op
        store.delete("alpha").unwrap();
    }

    #[test]
    fn test_raw_returns_document_text() {
        let temp = TempDir::new().unwrap();
        let store = PlanStore::open(temp.path()).unwrap();

        store.save("nums", &vec![1, 2]).unwrap();
        let raw = store.raw("nums").unwrap().unwrap();
        assert_eq!(raw, "[1,2]");
        assert!(store.raw("missing").unwrap().is_none());
    }
}
