//! Remote announcement source port definition.

use async_trait::async_trait;

use crate::domain::entities::{Announcement, UserIdentity};
use crate::domain::errors::RemoteError;

/// Port for the network side of announcement synchronization.
///
/// The count is returned as the server sent it; clamping happens during
/// reconciliation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementSourcePort: Send + Sync {
    /// Fetches the precomputed unread count for `identity`.
    async fn fetch_unread_count(&self, identity: &UserIdentity) -> Result<i64, RemoteError>;

    /// Fetches the full announcement set for `identity`.
    async fn fetch_announcements(
        &self,
        identity: &UserIdentity,
    ) -> Result<Vec<Announcement>, RemoteError>;
}
