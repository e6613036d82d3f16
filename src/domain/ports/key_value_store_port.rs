//! Persistent key/value store port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::StoreError;

/// Port for the durable key/value cache.
///
/// No atomicity is promised across two keys; readers must tolerate seeing
/// one key updated and the other not.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Reads the raw bytes under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Replaces the bytes under `key`.
    async fn set(&self, key: &str, value: Bytes) -> Result<(), StoreError>;

    /// Deletes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use parking_lot::Mutex;

    /// In-memory store that counts every access and can be told to fail.
    #[derive(Default)]
    pub struct MockKeyValueStore {
        entries: Mutex<HashMap<String, Bytes>>,
        accesses: AtomicUsize,
        fail_reads: AtomicBool,
    }

    impl MockKeyValueStore {
        /// Creates empty mock store.
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds a raw value without counting an access.
        pub fn seed(&self, key: &str, value: impl Into<Bytes>) {
            self.entries.lock().insert(key.to_string(), value.into());
        }

        /// Returns the raw value without counting an access.
        pub fn peek(&self, key: &str) -> Option<Bytes> {
            self.entries.lock().get(key).cloned()
        }

        /// Number of get/set/remove calls so far.
        pub fn accesses(&self) -> usize {
            self.accesses.load(Ordering::SeqCst)
        }

        /// Makes every subsequent read fail.
        pub fn set_fail_reads(&self, value: bool) {
            self.fail_reads.store(value, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl KeyValueStorePort for MockKeyValueStore {
        async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
            self.accesses.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::read_failed(key, "mock read failure"));
            }
            Ok(self.entries.lock().get(key).cloned())
        }

        async fn set(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
            self.accesses.fetch_add(1, Ordering::SeqCst);
            self.entries.lock().insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.accesses.fetch_add(1, Ordering::SeqCst);
            self.entries.lock().remove(key);
            Ok(())
        }
    }
}
