//! Sign-in use case.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::application::services::{AnnouncementRepository, SessionIdentity};
use crate::domain::entities::{SESSION_IDENTITY_KEY, UserIdentity};
use crate::domain::errors::StoreError;
use crate::domain::ports::KeyValueStorePort;

/// Makes an identity current and persists it as the session.
///
/// Switching from another identity discards that identity's cached
/// announcements and read set.
pub struct SignInUseCase {
    session: Arc<SessionIdentity>,
    repository: AnnouncementRepository,
    store: Arc<dyn KeyValueStorePort>,
}

impl SignInUseCase {
    /// Creates new sign-in use case.
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

    /// Signs `identity` in.
    ///
    /// # Errors
    /// Returns error if the session cannot be persisted.
    pub async fn execute(&self, identity: UserIdentity) -> Result<(), StoreError> {
        let previous = match self.session.replace(Some(identity.clone())) {
            Some(previous) => Some(previous),
            None => self.stored_session().await,
        };

        if let Some(previous) = previous.filter(|p| *p != identity) {
            info!(from = %previous, to = %identity, "Switching identity");
            if let Err(e) = self.repository.clear(&previous).await {
                warn!(identity = %previous, error = %e, "Failed to clear previous identity");
            }
        }

        self.store
            .set(
                SESSION_IDENTITY_KEY,
                Bytes::from(identity.as_str().to_owned()),
            )
            .await?;

        info!(identity = %identity, "Signed in");
        Ok(())
    }

    /// Identity persisted by an earlier process, if readable.
    async fn stored_session(&self) -> Option<UserIdentity> {
        match self.store.get(SESSION_IDENTITY_KEY).await {
            Ok(bytes) => bytes.and_then(|b| UserIdentity::new(String::from_utf8_lossy(&b))),
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                None
            }
        }
    }
}
