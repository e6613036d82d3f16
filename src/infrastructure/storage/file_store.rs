//! File-backed key/value store.
//!
//! Each key maps to one file in the store directory. Writes go through a
//! temporary file that is renamed into place, so a crash never leaves a
//! half-written payload behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use directories::ProjectDirs;
use tokio::fs;
use tracing::{debug, trace};

use crate::domain::errors::StoreError;
use crate::domain::ports::KeyValueStorePort;
use crate::infrastructure::config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER};

const STORE_DIR_NAME: &str = "store";
const ENTRY_EXTENSION: &str = "json";

/// Key/value store persisting each key as a file.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Creates a store in the platform data directory
    /// (e.g. `~/.local/share/noticeboard/store/`).
    #[must_use]
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::new(dirs.data_dir().join(STORE_DIR_NAME)))
    }

    /// Returns the store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{ENTRY_EXTENSION}", encode_key(key)))
    }
}

/// Escapes every byte outside `[A-Za-z0-9_-]` as `%XX`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

fn write_atomic(dir: &Path, path: &Path, value: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
    temp_file.write_all(value)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let path = self.entry_path(key);

        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(key, path = %path.display(), "Store hit");
                Ok(Some(Bytes::from(bytes)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(key, "Store miss");
                Ok(None)
            }
            Err(e) => Err(StoreError::read_failed(key, e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        let dir = self.dir.clone();
        let path = self.entry_path(key);

        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, &value))
            .await
            .map_err(|e| StoreError::write_failed(key, format!("write task failed: {e}")))?
            .map_err(|e| StoreError::write_failed(key, e.to_string()))?;

        debug!(key, "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => {
                debug!(key, "Removed value");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::write_failed(key, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("student_id"), "student_id");
        assert_eq!(encode_key("announcements:42"), "announcements%3A42");
        assert_eq!(encode_key("../x"), "%2E%2E%2Fx");
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("store"));

        assert!(store.get("readAnnouncements:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_creates_directory_and_persists() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("store");
        let store = FileKeyValueStore::new(store_dir.clone());

        store
            .set("readAnnouncements:1", Bytes::from_static(b"[\"a1\"]"))
            .await
            .unwrap();

        assert!(store_dir.join("readAnnouncements%3A1.json").exists());

        let reopened = FileKeyValueStore::new(store_dir);
        assert_eq!(
            reopened.get("readAnnouncements:1").await.unwrap(),
            Some(Bytes::from_static(b"[\"a1\"]"))
        );
    }

    #[tokio::test]
    async fn test_overwrite_and_remove() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().to_path_buf());

        store.set("k", Bytes::from_static(b"one")).await.unwrap();
        store.set("k", Bytes::from_static(b"two")).await.unwrap();
        assert_eq!(
            store.get("k").await.unwrap(),
            Some(Bytes::from_static(b"two"))
        );

        tokio_test::assert_ok!(store.remove("k").await);
        tokio_test::assert_ok!(store.remove("k").await);
        assert!(store.get("k").await.unwrap().is_none());
    }
}
