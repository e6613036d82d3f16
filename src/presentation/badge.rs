//! Unread announcement badge.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::application::services::{RefreshScheduler, UnreadService};
use crate::domain::entities::UnreadCount;
use crate::domain::ports::NavigatorPort;

/// Counts above this value are displayed as `9+`.
pub const DEFAULT_OVERFLOW_THRESHOLD: u32 = 9;

/// Formats a count for display. Zero hides the badge.
#[must_use]
pub fn badge_label(count: u32, overflow_threshold: u32) -> Option<String> {
    match count {
        0 => None,
        n if n > overflow_threshold => Some(format!("{overflow_threshold}+")),
        n => Some(n.to_string()),
    }
}

/// Header badge showing the unread announcement count.
///
/// Reads whatever the scheduler last accepted. Activation marks everything
/// read, refreshes, and opens the notification list.
pub struct BadgePresenter {
    scheduler: Arc<RefreshScheduler>,
    service: Arc<UnreadService>,
    navigator: Arc<dyn NavigatorPort>,
    overflow_threshold: u32,
}

impl BadgePresenter {
    /// Creates a presenter with the default overflow threshold.
    #[must_use]
    pub fn new(
        scheduler: Arc<RefreshScheduler>,
        service: Arc<UnreadService>,
        navigator: Arc<dyn NavigatorPort>,
    ) -> Self {
        Self {
            scheduler,
            service,
            navigator,
            overflow_threshold: DEFAULT_OVERFLOW_THRESHOLD,
        }
    }

    /// Sets the overflow threshold.
    #[must_use]
    pub const fn with_overflow_threshold(mut self, threshold: u32) -> Self {
        self.overflow_threshold = threshold;
        self
    }

    /// Current unread count.
    #[must_use]
    pub fn unread_count(&self) -> u32 {
        self.scheduler.unread_count().get()
    }

    /// Text to show, or `None` when the badge is hidden.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        badge_label(self.unread_count(), self.overflow_threshold)
    }

    /// Formats an arbitrary count with this presenter's threshold.
    #[must_use]
    pub fn label_for(&self, count: UnreadCount) -> Option<String> {
        badge_label(count.get(), self.overflow_threshold)
    }

    /// Receiver notified whenever the displayed count changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UnreadCount> {
        self.scheduler.subscribe()
    }

    /// Handles a tap on the badge.
    ///
    /// Store failures are logged; navigation happens regardless.
    pub async fn on_activate(&self) {
        match self.service.mark_all_read().await {
            Ok(true) => {
                self.scheduler.publish_local(UnreadCount::ZERO);
            }
            Ok(false) => debug!("Nothing new to mark as read"),
            Err(e) => warn!(error = %e, "Failed to mark announcements as read"),
        }

        let outcome = self.scheduler.force_refresh();
        debug!(?outcome, "Refresh after activation");

        self.navigator.open_notifications();
    }
}
