//! Sign-out use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::services::{AnnouncementRepository, SessionIdentity};
use crate::domain::entities::{SESSION_IDENTITY_KEY, UserIdentity};
use crate::domain::errors::StoreError;
use crate::domain::ports::KeyValueStorePort;

/// Ends the session and discards everything stored for the identity.
pub struct SignOutUseCase {
    session: Arc<SessionIdentity>,
    repository: AnnouncementRepository,
    store: Arc<dyn KeyValueStorePort>,
}

impl SignOutUseCase {
    /// Creates new sign-out use case.
    #[must_use]
    pub const fn new(
        session: Arc<SessionIdentity>,
        repository: AnnouncementRepository,
        store: Arc<dyn KeyValueStorePort>,
    ) -> Self {
        Self {
            session,
            repository,
            store,
        }
    }

    /// Signs out. Returns the identity that was signed in, if any.
    ///
    /// The session is cleared before the store so that passes starting
    /// meanwhile already see no identity.
    ///
    /// # Errors
    /// Returns error if stored data cannot be removed.
    pub async fn execute(&self) -> Result<Option<UserIdentity>, StoreError> {
        let Some(identity) = self.session.replace(None) else {
            debug!("Sign-out requested with no identity");
            return Ok(None);
        };

        self.repository.clear(&identity).await?;
        self.store.remove(SESSION_IDENTITY_KEY).await?;

        info!(identity = %identity, "Signed out");
        Ok(Some(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ReadSet;
    use crate::domain::ports::IdentityPort;
    use crate::domain::ports::mocks::MockKeyValueStore;

    #[tokio::test]
    async fn test_sign_out_clears_everything() {
        let store = Arc::new(MockKeyValueStore::new());
        let repository = AnnouncementRepository::new(store.clone());
        let identity = UserIdentity::new("1024").unwrap();
        repository.save_read_set(&identity, &ReadSet::new()).await.unwrap();
        store.seed(SESSION_IDENTITY_KEY, "1024");

        let session = Arc::new(SessionIdentity::new(Some(identity.clone())));
        let use_case = SignOutUseCase::new(session.clone(), repository, store.clone());

        let signed_out = use_case.execute().await.unwrap();

        assert_eq!(signed_out, Some(identity.clone()));
        assert!(session.current().is_none());
        assert!(store.peek(&identity.read_announcements_key()).is_none());
        assert!(store.peek(SESSION_IDENTITY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_sign_out_without_identity() {
        let store = Arc::new(MockKeyValueStore::new());
        let use_case = SignOutUseCase::new(
            Arc::new(SessionIdentity::default()),
            AnnouncementRepository::new(store.clone()),
            store.clone(),
        );

        assert!(use_case.execute().await.unwrap().is_none());
        assert_eq!(store.accesses(), 0);
    }
}
