//! # File Store
//!
//! Directory-backed [`KeyValueStore`]. Each key lives in its own JSON file:
//!
//! ```text
//! data/
//! ├── academy.yaml              (optional configuration)
//! ├── academy.students.json
//! ├── academy.classCards.json
//! └── academy.testResults.json
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-write leaves the previous blob intact.

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStore;
use crate::domain::errors::StorageError;

#[derive(Debug, Clone)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, StorageError> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|source| StorageError::Io {
                path: base_path.clone(),
                source,
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Turn a store key into a safe file name.
    /// "academy.classCards" -> "academy.classCards.json", "a/b c" -> "a_b_c.json"
    pub fn file_name_for_key(key: &str) -> String {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}.json", safe.trim_matches('.'))
    }

    pub fn path_for_key(&self, key: &str) -> PathBuf {
        self.base_directory.join(Self::file_name_for_key(key))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for_key(key);
        if !path.exists() {
            debug!("No file for key '{}' at {}", key, path.display());
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some).map_err(io_error(&path))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for_key(key);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value).map_err(io_error(&temp_path))?;
        fs::rename(&temp_path, &path).map_err(io_error(&path))?;

        debug!("Wrote {} bytes for key '{}' to {}", value.len(), key, path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for_key(key);
        if path.exists() {
            fs::remove_file(&path).map_err(io_error(&path))?;
            info!("Removed {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_file_name_for_key() {
        assert_eq!(FileStore::file_name_for_key("academy.students"), "academy.students.json");
        assert_eq!(FileStore::file_name_for_key("classCards"), "classCards.json");
        assert_eq!(FileStore::file_name_for_key("../etc/passwd"), "_etc_passwd.json");
        assert_eq!(FileStore::file_name_for_key("my store"), "my_store.json");
    }

    #[test]
    fn test_set_get_remove() {
        let (store, _temp_dir) = setup_test_store();

        assert_eq!(store.get("academy.students").unwrap(), None);

        store.set("academy.students", "[1,2,3]").unwrap();
        assert_eq!(store.get("academy.students").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(store.path_for_key("academy.students").exists());
        assert!(!store.path_for_key("academy.students").with_extension("json.tmp").exists());

        store.set("academy.students", "[]").unwrap();
        assert_eq!(store.get("academy.students").unwrap().as_deref(), Some("[]"));

        store.remove("academy.students").unwrap();
        assert_eq!(store.get("academy.students").unwrap(), None);
        // second removal is a no-op
        store.remove("academy.students").unwrap();
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let store = FileStore::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.base_directory(), nested.as_path());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("gone")).unwrap();
        std::fs::remove_dir_all(temp_dir.path().join("gone")).unwrap();

        let err = store.set("academy.students", "[]").unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
