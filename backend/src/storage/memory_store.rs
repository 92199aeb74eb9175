use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::traits::KeyValueStore;
use crate::domain::errors::StorageError;

/// In-process store. Used for tests and for running without a data directory.
///
/// Can be flipped read-only to simulate a full disk or a revoked quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.is_read_only() {
            return Err(StorageError::ReadOnly {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_rejects_writes() {
        let store = MemoryStore::new();
        store.set("students", "[]").unwrap();

        store.set_read_only(true);
        let err = store.set("students", "[1]").unwrap_err();
        assert!(matches!(err, StorageError::ReadOnly { ref key } if key == "students"));
        assert!(store.remove("students").is_err());

        // reads still work and see the last successful write
        assert_eq!(store.get("students").unwrap().as_deref(), Some("[]"));

        store.set_read_only(false);
        store.remove("students").unwrap();
        assert!(store.keys().is_empty());
    }
}
