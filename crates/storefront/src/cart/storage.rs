//! Key/value persistence backends for the cart snapshot.
//!
//! The cart only ever needs a blob store shaped like browser web storage:
//! read a string by key, overwrite it, delete it. There is no locking and
//! no conflict detection; whoever saves last wins.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by a storage backend.
///
/// The cart store logs these and carries on; they never reach cart callers.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters the backend cannot address.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Filesystem operation failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A key/value blob store.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// Process-local storage, the equivalent of a page's web storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single entry.
    #[must_use]
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }

    /// Take the value out of the store, leaving the key empty.
    pub fn take_item(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File-backed storage
// =============================================================================

/// Storage that keeps each key in `<dir>/<key>.json`.
///
/// Writes go through a temporary file in the same directory followed by a
/// rename, so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage root. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage root.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` unless the key is non-empty and made
    /// of ASCII letters, digits, `_` and `-`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut file = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("ochag_cart").unwrap(), None);

        storage.set_item("ochag_cart", "{}").unwrap();
        assert_eq!(storage.get_item("ochag_cart").unwrap().as_deref(), Some("{}"));

        storage.remove_item("ochag_cart").unwrap();
        assert_eq!(storage.get_item("ochag_cart").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_last_write_wins() {
        let mut storage = MemoryStorage::with_item("k", "first");
        storage.set_item("k", "second").unwrap();
        assert_eq!(storage.take_item("k").as_deref(), Some("second"));
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("ochag_cart").unwrap(), None);
        storage.set_item("ochag_cart", r#"{"items":[]}"#).unwrap();
        assert_eq!(
            storage.get_item("ochag_cart").unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );
        assert!(dir.path().join("nested/ochag_cart.json").exists());
    }

    #[test]
    fn test_file_storage_overwrite_and_remove() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());

        storage.set_item("cart", "a").unwrap();
        storage.set_item("cart", "b").unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("b"));

        storage.remove_item("cart").unwrap();
        storage.remove_item("cart").unwrap();
        assert_eq!(storage.get_item("cart").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());

        for key in ["", "../escape", "a/b", "dots.json"] {
            assert!(matches!(
                storage.set_item(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_storage_through_mutable_reference() {
        fn write_through<S: Storage>(mut storage: S) {
            storage.set_item("k", "v").unwrap();
        }

        let mut backing = MemoryStorage::new();
        write_through(&mut backing);
        assert_eq!(backing.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
