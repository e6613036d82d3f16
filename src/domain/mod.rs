//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Refresh scheduling vocabulary.
pub mod refresh;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{Announcement, AnnouncementId, ReadSet, UnreadCount, UserIdentity};
pub use errors::{RemoteError, StoreError};
pub use ports::{AnnouncementSourcePort, IdentityPort, KeyValueStorePort, NavigatorPort};
pub use refresh::{LifecycleEvent, RefreshTrigger, SchedulerState, SyncMode};
