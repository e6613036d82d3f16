//! Unread count reconciliation.
//!
//! Pure functions over an announcement set and a read set. No I/O happens
//! here; callers gather inputs and persist outputs.

use tracing::warn;

use crate::domain::entities::{Announcement, ReadSet, UnreadCount};

/// Counts announcements whose id is not in `read_set`.
///
/// Duplicate ids in `announcements` are counted once, so the result is
/// always `|A| - |A ∩ R|` over the set of distinct ids.
#[must_use]
pub fn compute_unread(announcements: &[Announcement], read_set: &ReadSet) -> UnreadCount {
    let mut seen = std::collections::HashSet::with_capacity(announcements.len());
    let unread = announcements
        .iter()
        .filter(|a| seen.insert(&a.id))
        .filter(|a| !read_set.contains(&a.id))
        .count();

    UnreadCount::from_len(unread)
}

/// Returns `read_set` extended with every announcement id.
///
/// Existing entries are never removed.
#[must_use]
pub fn mark_all_read(announcements: &[Announcement], read_set: &ReadSet) -> ReadSet {
    let mut updated = read_set.clone();
    updated.extend(announcements.iter().map(|a| a.id.clone()));
    updated
}

/// Converts a server-side count into the displayed value.
///
/// The remote value replaces local knowledge outright; negative values are
/// clamped to zero.
#[must_use]
pub fn reconcile_remote_count(remote: i64) -> UnreadCount {
    if remote < 0 {
        warn!(remote, "Remote unread count is negative, clamping to zero");
        return UnreadCount::ZERO;
    }

    UnreadCount::new(u32::try_from(remote).unwrap_or(u32::MAX))
}
