//! JSON-file preference store for non-secret persisted state.
//!
//! Holds the session token, serialized user profile, and onboarding flag.
//! The whole store is one JSON object written atomically (temp file +
//! rename), so multi-key updates either land together or not at all.

use crate::{StorageError, StorageResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

/// File-backed key-value store for preferences and session state.
pub struct PreferenceStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl PreferenceStore {
    /// Open the store at the given path.
    ///
    /// A missing or unreadable file yields an empty store; corruption is
    /// logged and discarded rather than failing startup.
    pub fn open(path: PathBuf) -> Self {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Preference store corrupted, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Retrieve a value.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Store a value and persist.
    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    /// Store several values in one write.
    pub fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let mut values = self.values.lock().unwrap();
        for (key, value) in entries {
            values.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&values)
    }

    /// Remove a value and persist. Returns whether the key was present.
    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut values = self.values.lock().unwrap();
        let removed = values.remove(key).is_some();
        self.persist(&values)?;
        Ok(removed)
    }

    /// Remove several values in one write.
    pub fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        let mut values = self.values.lock().unwrap();
        for key in keys {
            values.remove(*key);
        }
        self.persist(&values)
    }

    /// Write the store to disk atomically.
    fn persist(&self, values: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(values)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
