//! Domain entity definitions.

mod announcement;
mod identity;
mod read_set;
mod unread_count;

pub use announcement::{Announcement, AnnouncementId};
pub use identity::{SESSION_IDENTITY_KEY, UserIdentity};
pub use read_set::ReadSet;
pub use unread_count::UnreadCount;
