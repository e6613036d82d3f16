//! Reconciliation passes over the configured synchronization mode.

use std::sync::Arc;

use tracing::{debug, warn};

use super::announcement_repository::AnnouncementRepository;
use super::reconciliation::{compute_unread, mark_all_read, reconcile_remote_count};
use crate::domain::entities::{UnreadCount, UserIdentity};
use crate::domain::errors::StoreError;
use crate::domain::ports::{AnnouncementSourcePort, IdentityPort};
use crate::domain::refresh::SyncMode;

/// Where the count of a pass came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    /// No identity; nothing was read.
    Anonymous,
    /// Fresh data from the remote source.
    Remote,
    /// Local store in offline mode.
    Local,
    /// Local store after a failed remote fetch.
    Cache,
    /// Inputs unavailable; previous count kept.
    Retained,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassResult {
    /// Count to display.
    pub count: UnreadCount,
    /// Origin of the count.
    pub source: CountSource,
}

impl PassResult {
    const fn new(count: UnreadCount, source: CountSource) -> Self {
        Self { count, source }
    }

    const fn anonymous() -> Self {
        Self::new(UnreadCount::ZERO, CountSource::Anonymous)
    }

    const fn retained(previous: UnreadCount) -> Self {
        Self::new(previous, CountSource::Retained)
    }
}

/// Produces the best currently-known unread count.
///
/// Failures never escape a pass: they are logged and turned into a cache
/// fallback or a retained count.
pub struct UnreadService {
    identity: Arc<dyn IdentityPort>,
    repository: AnnouncementRepository,
    remote: Option<Arc<dyn AnnouncementSourcePort>>,
    mode: SyncMode,
}

impl UnreadService {
    /// Creates a service. Remote modes without a remote source fall back to
    /// [`SyncMode::Local`].
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityPort>,
        repository: AnnouncementRepository,
        remote: Option<Arc<dyn AnnouncementSourcePort>>,
        mode: SyncMode,
    ) -> Self {
        let mode = if mode.is_remote() && remote.is_none() {
            warn!(%mode, "No remote source configured, using local mode");
            SyncMode::Local
        } else {
            mode
        };

        Self {
            identity,
            repository,
            remote,
            mode,
        }
    }

    /// Effective synchronization mode.
    #[must_use]
    pub const fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Runs one reconciliation pass.
    ///
    /// `previous` is the currently displayed count, kept when no input can
    /// be read.
    pub async fn refresh(&self, previous: UnreadCount) -> PassResult {
        let Some(identity) = self.identity.current() else {
            debug!("No identity, reporting zero unread");
            return PassResult::anonymous();
        };

        match (self.mode, &self.remote) {
            (SyncMode::List, Some(remote)) => self.list_pass(remote, &identity, previous).await,
            (SyncMode::Count, Some(remote)) => Self::count_pass(remote, &identity, previous).await,
            _ => self.local_pass(&identity, previous, CountSource::Local).await,
        }
    }

    /// Marks every cached announcement as read and persists the read set.
    ///
    /// Returns `false` without touching the store when nobody is signed in.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or written.
    pub async fn mark_all_read(&self) -> Result<bool, StoreError> {
        let Some(identity) = self.identity.current() else {
            return Ok(false);
        };

        let (announcements, read_set) = self.repository.load_snapshot(&identity).await?;
        let updated = mark_all_read(&announcements, &read_set);

        if updated != read_set {
            self.repository.save_read_set(&identity, &updated).await?;
            debug!(
                identity = %identity,
                newly_read = updated.len() - read_set.len(),
                "Marked announcements as read"
            );
        }

        Ok(true)
    }

    async fn local_pass(
        &self,
        identity: &UserIdentity,
        previous: UnreadCount,
        source: CountSource,
    ) -> PassResult {
        match self.repository.load_snapshot(identity).await {
            Ok((announcements, read_set)) => {
                PassResult::new(compute_unread(&announcements, &read_set), source)
            }
            Err(e) => {
                warn!(identity = %identity, error = %e, "Failed to read announcement state");
                PassResult::retained(previous)
            }
        }
    }

    async fn list_pass(
        &self,
        remote: &Arc<dyn AnnouncementSourcePort>,
        identity: &UserIdentity,
        previous: UnreadCount,
    ) -> PassResult {
        let announcements = match remote.fetch_announcements(identity).await {
            Ok(announcements) => announcements,
            Err(e) => {
                warn!(identity = %identity, error = %e, "Announcement fetch failed, using cache");
                return self.local_pass(identity, previous, CountSource::Cache).await;
            }
        };

        if let Err(e) = self
            .repository
            .save_announcements(identity, &announcements)
            .await
        {
            warn!(identity = %identity, error = %e, "Failed to cache announcements");
        }

        match self.repository.load_read_set(identity).await {
            Ok(read_set) => PassResult::new(
                compute_unread(&announcements, &read_set),
                CountSource::Remote,
            ),
            Err(e) => {
                warn!(identity = %identity, error = %e, "Failed to read read set");
                PassResult::retained(previous)
            }
        }
    }

    async fn count_pass(
        remote: &Arc<dyn AnnouncementSourcePort>,
        identity: &UserIdentity,
        previous: UnreadCount,
    ) -> PassResult {
        match remote.fetch_unread_count(identity).await {
            Ok(count) => PassResult::new(reconcile_remote_count(count), CountSource::Remote),
            Err(e) => {
                warn!(identity = %identity, error = %e, "Unread count fetch failed");
                PassResult::retained(previous)
            }
        }
    }
}
