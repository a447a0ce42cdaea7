//! File-backed blob store.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a temp file first
//! and are renamed into place so a crash never leaves a half-written tree.

use super::blob_store::BlobStore;
use super::error::StorageError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FILE_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| StorageError::directory_creation_failed(dir.clone(), e))?;
        tracing::debug!("Opened file store at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds `key`.
    ///
    /// Keys are limited to ASCII letters, digits, `_` and `-` so they can
    /// never escape the store directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::invalid_key(key));
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::read_failed(path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension(format!("{FILE_EXTENSION}.tmp"));

        // Atomic write: write to temp file, then rename
        fs::write(&temp_path, value)
            .map_err(|e| StorageError::write_failed(temp_path.clone(), e))?;
        fs::rename(&temp_path, &path).map_err(|e| StorageError::write_failed(path.clone(), e))?;

        tracing::debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::remove_failed(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::open(temp_dir.path().join("data")).unwrap();

        assert_eq!(store.get("familyTreeData").unwrap(), None);
        store.set("familyTreeData", "[{\"id\":\"a\"}]").unwrap();

        let reopened = FileStore::open(store.dir().to_path_buf()).unwrap();
        assert_eq!(
            reopened.get("familyTreeData").unwrap().as_deref(),
            Some("[{\"id\":\"a\"}]")
        );
        assert!(!store.dir().join("familyTreeData.json.tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::open(temp_dir.path()).unwrap();

        store.set("layoutMode", "wide").unwrap();
        store.remove("layoutMode").unwrap();
        store.remove("layoutMode").unwrap();
        assert_eq!(store.get("layoutMode").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::open(temp_dir.path()).unwrap();

        for key in ["", "../escape", "a/b", "with space"] {
            assert!(matches!(
                store.set(key, "x"),
                Err(StorageError::InvalidKey { .. })
            ));
        }
    }
}
