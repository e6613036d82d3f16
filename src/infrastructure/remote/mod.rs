//! Remote announcement source.

mod client;
mod dto;

pub use client::{DEFAULT_TIMEOUT, HttpAnnouncementSource};
pub use dto::{AnnouncementsResponse, ErrorResponse, UnreadCountResponse};
