//! Typed access to the per-identity announcement keys.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::entities::{Announcement, ReadSet, UserIdentity};
use crate::domain::errors::StoreError;
use crate::domain::ports::KeyValueStorePort;

/// Reads and writes the cached announcement set and the read set.
///
/// Missing keys and undecodable payloads both come back as empty
/// collections. Only I/O failures are reported as errors.
#[derive(Clone)]
pub struct AnnouncementRepository {
    store: Arc<dyn KeyValueStorePort>,
}

impl AnnouncementRepository {
    /// Creates a repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    /// Loads the cached announcement set.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub async fn load_announcements(
        &self,
        identity: &UserIdentity,
    ) -> Result<Vec<Announcement>, StoreError> {
        self.load_json(&identity.announcements_key()).await
    }

    /// Replaces the cached announcement set.
    ///
    /// # Errors
    /// Returns error if the payload cannot be encoded or written.
    pub async fn save_announcements(
        &self,
        identity: &UserIdentity,
        announcements: &[Announcement],
    ) -> Result<(), StoreError> {
        self.save_json(&identity.announcements_key(), announcements)
            .await
    }

    /// Loads the read set.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub async fn load_read_set(&self, identity: &UserIdentity) -> Result<ReadSet, StoreError> {
        self.load_json(&identity.read_announcements_key()).await
    }

    /// Replaces the read set.
    ///
    /// # Errors
    /// Returns error if the payload cannot be encoded or written.
    pub async fn save_read_set(
        &self,
        identity: &UserIdentity,
        read_set: &ReadSet,
    ) -> Result<(), StoreError> {
        self.save_json(&identity.read_announcements_key(), read_set)
            .await
    }

    /// Loads both keys concurrently.
    ///
    /// The two reads are independent; a writer may land between them.
    ///
    /// # Errors
    /// Returns the first read error encountered.
    pub async fn load_snapshot(
        &self,
        identity: &UserIdentity,
    ) -> Result<(Vec<Announcement>, ReadSet), StoreError> {
        let (announcements, read_set) = tokio::join!(
            self.load_announcements(identity),
            self.load_read_set(identity)
        );
        Ok((announcements?, read_set?))
    }

    /// Deletes both keys for `identity`.
    ///
    /// # Errors
    /// Returns the first removal error encountered.
    pub async fn clear(&self, identity: &UserIdentity) -> Result<(), StoreError> {
        self.store.remove(&identity.announcements_key()).await?;
        self.store.remove(&identity.read_announcements_key()).await?;
        debug!(identity = %identity, "Cleared announcement state");
        Ok(())
    }

    async fn load_json<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(bytes) = self.store.get(key).await? else {
            return Ok(T::default());
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(e) => {
                let error = StoreError::corrupt(key, e.to_string());
                warn!(error = %error, "Discarding unreadable payload");
                Ok(T::default())
            }
        }
    }

    async fn save_json<T>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let encoded =
            serde_json::to_vec(value).map_err(|e| StoreError::encode(key, e.to_string()))?;
        self.store.set(key, Bytes::from(encoded)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AnnouncementId;
    use crate::domain::ports::mocks::MockKeyValueStore;

    fn setup() -> (Arc<MockKeyValueStore>, AnnouncementRepository, UserIdentity) {
        let store = Arc::new(MockKeyValueStore::new());
        let repo = AnnouncementRepository::new(store.clone());
        (store, repo, UserIdentity::new("1024").unwrap())
    }

    #[tokio::test]
    async fn test_missing_keys_are_empty() {
        let (_store, repo, identity) = setup();

        let (announcements, read_set) = repo.load_snapshot(&identity).await.unwrap();

        assert!(announcements.is_empty());
        assert!(read_set.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_payloads_are_empty() {
        let (store, repo, identity) = setup();
        store.seed(&identity.announcements_key(), "{not json");
        store.seed(&identity.read_announcements_key(), r#"{"a": 1}"#);

        let (announcements, read_set) = repo.load_snapshot(&identity).await.unwrap();

        assert!(announcements.is_empty());
        assert!(read_set.is_empty());
    }

    #[tokio::test]
    async fn test_reads_legacy_payloads() {
        let (store, repo, identity) = setup();
        store.seed(
            &identity.announcements_key(),
            r#"[{"id": 1, "title": "Welcome"}, {"id": "2"}]"#,
        );
        store.seed(&identity.read_announcements_key(), r#"[1]"#);

        let (announcements, read_set) = repo.load_snapshot(&identity).await.unwrap();

        assert_eq!(announcements.len(), 2);
        assert!(read_set.contains(&AnnouncementId::from("1")));
    }

    #[tokio::test]
    async fn test_read_set_persists() {
        let (_store, repo, identity) = setup();
        let read_set: ReadSet = [AnnouncementId::from("a1")].into_iter().collect();

        repo.save_read_set(&identity, &read_set).await.unwrap();

        assert_eq!(repo.load_read_set(&identity).await.unwrap(), read_set);
    }

    #[tokio::test]
    async fn test_read_failure_propagates() {
        let (store, repo, identity) = setup();
        store.set_fail_reads(true);

        assert!(repo.load_read_set(&identity).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_removes_both_keys() {
        let (store, repo, identity) = setup();
        repo.save_announcements(&identity, &[Announcement::new("a1")])
            .await
            .unwrap();
        repo.save_read_set(&identity, &ReadSet::new()).await.unwrap();

        repo.clear(&identity).await.unwrap();

        assert!(store.peek(&identity.announcements_key()).is_none());
        assert!(store.peek(&identity.read_announcements_key()).is_none());
    }
}
