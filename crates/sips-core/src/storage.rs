//! Durable key-value storage.
//!
//! Each key is one whole JSON document stored as `<dir>/<key>.json`.
//! Values are always read and written whole; there is no partial update.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Key holding the last resolved location.
pub const LOCATION_CACHE_KEY: &str = "cachedLocation";

/// Key holding the saved cafe collection.
pub const SAVED_CAFES_KEY: &str = "savedCafes";

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| StorageError::Unavailable(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read the value stored under `key`.
    ///
    /// A missing key is `Ok(None)`. A blob that no longer parses is also
    /// treated as absent so a bad write can't wedge the app.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.key_path(key);

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }
        };

        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Discarding unreadable value for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Replace the value stored under `key`
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.key_path(key);

        let json = serde_json::to_string(value).map_err(|e| StorageError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        // Write-then-rename so a crash never leaves half a document behind.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!("Stored {} at {:?}", key, path);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);

        if path.exists() {
            fs::remove_file(&path).map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let value: Option<Vec<u32>> = store.read(SAVED_CAFES_KEY).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_replaces_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        store.write(SAVED_CAFES_KEY, &vec![1, 2, 3]).unwrap();
        store.write(SAVED_CAFES_KEY, &vec![4]).unwrap();

        let value: Option<Vec<u32>> = store.read(SAVED_CAFES_KEY).unwrap();
        assert_eq!(value, Some(vec![4]));
        assert!(dir.path().join("savedCafes.json").exists());
    }

    #[test]
    fn test_corrupt_value_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("cachedLocation.json"), "{not json").unwrap();

        let value: Option<serde_json::Value> = store.read(LOCATION_CACHE_KEY).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        store.write(LOCATION_CACHE_KEY, &"x").unwrap();
        store.remove(LOCATION_CACHE_KEY).unwrap();
        store.remove(LOCATION_CACHE_KEY).unwrap();

        let value: Option<String> = store.read(LOCATION_CACHE_KEY).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }
}
