//! Identity port definition.

use crate::domain::entities::UserIdentity;

/// Port exposing the currently signed-in user, if any.
pub trait IdentityPort: Send + Sync {
    /// Returns the current identity; `None` means anonymous.
    fn current(&self) -> Option<UserIdentity>;
}
