use serde::Deserialize;

use crate::domain::entities::Announcement;

/// Unread count response structure.
#[derive(Debug, Deserialize)]
pub struct UnreadCountResponse {
    /// Server-side unread count.
    pub count: i64,
}

/// Announcement list response; either a bare array or wrapped in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnnouncementsResponse {
    /// `[...]`
    Bare(Vec<Announcement>),
    /// `{ "announcements": [...] }`
    Wrapped {
        /// The announcements.
        announcements: Vec<Announcement>,
    },
}

impl AnnouncementsResponse {
    /// Unwraps the announcement list.
    #[must_use]
    pub fn into_announcements(self) -> Vec<Announcement> {
        match self {
            Self::Bare(announcements) | Self::Wrapped { announcements } => announcements,
        }
    }
}

/// Error body structure.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Error message from the server.
    #[serde(alias = "error")]
    pub message: String,
}
