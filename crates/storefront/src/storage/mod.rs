//! Durable client storage.
//!
//! A small key/value store of string values that survives restarts, playing
//! the part browser local storage plays for a single-page app. The session
//! token and the wishlist/cart snapshots live here under fixed keys.
//!
//! Two implementations:
//! - [`FileStorage`] keeps every key in one JSON object file and rewrites it
//!   through a temp file on each change
//! - [`MemoryStorage`] for tests and throwaway sessions

mod snapshot;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

pub use snapshot::ProductSnapshot;

/// Storage keys.
pub mod keys {
    /// Key for the session token.
    pub const TOKEN: &str = "token";

    /// Key for the wishlist snapshot (JSON array of product ids).
    pub const WISHLIST: &str = "wishlist";

    /// Key for the cart snapshot (JSON array of product ids).
    pub const CART: &str = "cart";
}

/// Errors that can occur when reading or writing client storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the storage file failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The storage file or a stored value is not valid JSON.
    #[error("storage contents are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A previous writer panicked while holding the storage lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Key/value storage for client-side state.
pub trait ClientStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Read, change and write back the value under `key` as one step.
    ///
    /// `change` gets the current value and returns the new one; `None`
    /// deletes the key. No other write to this storage lands in between.
    ///
    /// # Errors
    ///
    /// Returns the error from `change`, or an error if the backing store
    /// cannot be written. Nothing is changed in either case.
    fn update(&self, key: &str, change: &mut Change<'_>) -> Result<(), StorageError>;
}

/// Callback for [`ClientStorage::update`].
pub type Change<'a> = dyn FnMut(Option<&str>) -> Result<Option<String>, StorageError> + 'a;

/// Run `change` against `entries[key]` and store what it returns.
fn apply(
    entries: &mut BTreeMap<String, String>,
    key: &str,
    change: &mut Change<'_>,
) -> Result<(), StorageError> {
    match change(entries.get(key).map(String::as_str))? {
        Some(value) => {
            entries.insert(key.to_string(), value);
        }
        None => {
            entries.remove(key);
        }
    }
    Ok(())
}

/// Shared handle to a storage implementation.
pub type SharedStorage = Arc<dyn ClientStorage>;

// =============================================================================
// FileStorage
// =============================================================================

/// Storage persisted as a single JSON object file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// A missing file is an empty store; parent directories are created on
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened client storage");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the storage file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the entries, write the copy out, and
    /// only then keep it. On any error the entries are left as they were.
    fn commit(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        let mut next = entries.clone();
        change(&mut next)?;
        self.write(&next)?;
        *entries = next;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.commit(|entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.commit(|entries| {
            entries.remove(key);
            Ok(())
        })
    }

    fn update(&self, key: &str, change: &mut Change<'_>) -> Result<(), StorageError> {
        self.commit(|entries| apply(entries, key, change))
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn update(&self, key: &str, change: &mut Change<'_>) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        apply(&mut entries, key, change)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
        storage.set(keys::TOKEN, "abc.def.ghi").unwrap();
        storage.set(keys::CART, "[\"p1\"]").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(keys::TOKEN).unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(reopened.get(keys::CART).unwrap().as_deref(), Some("[\"p1\"]"));

        reopened.remove(keys::TOKEN).unwrap();
        reopened.remove("never-set").unwrap();
        let again = FileStorage::open(&path).unwrap();
        assert_eq!(again.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(FileStorage::open(&path), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_file_storage_treats_empty_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(keys::WISHLIST).unwrap(), None);
    }

    #[test]
    fn test_failed_write_leaves_storage_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = FileStorage::open(&path).unwrap();
        storage.set(keys::TOKEN, "abc.def.ghi").unwrap();

        // A directory where the temp file goes makes every write fail.
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(matches!(storage.remove(keys::TOKEN), Err(StorageError::Io { .. })));
        assert!(storage.set(keys::CART, "[]").is_err());
        assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(storage.get(keys::CART).unwrap(), None);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(keys::TOKEN).unwrap().as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_update_reads_and_writes_in_one_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = FileStorage::open(&path).unwrap();

        storage
            .update("n", &mut |current| {
                assert_eq!(current, None);
                Ok(Some("1".to_string()))
            })
            .unwrap();
        storage
            .update("n", &mut |current| Ok(current.map(|v| format!("{v}1"))))
            .unwrap();
        assert_eq!(FileStorage::open(&path).unwrap().get("n").unwrap().as_deref(), Some("11"));

        let failed = storage.update("n", &mut |_| Err(StorageError::Poisoned));
        assert!(failed.is_err());
        assert_eq!(storage.get("n").unwrap().as_deref(), Some("11"));

        storage.update("n", &mut |_| Ok(None)).unwrap();
        assert_eq!(storage.get("n").unwrap(), None);
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }
}
