//! Process-wide holder of the signed-in identity.

use parking_lot::RwLock;

use crate::domain::entities::UserIdentity;
use crate::domain::ports::IdentityPort;

/// Current identity, switchable at runtime.
///
/// Every pass reads it afresh, so a sign-out takes effect on the next pass
/// without restarting the scheduler.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    current: RwLock<Option<UserIdentity>>,
}

impl SessionIdentity {
    /// Creates a session, optionally already signed in.
    #[must_use]
    pub fn new(identity: Option<UserIdentity>) -> Self {
        Self {
            current: RwLock::new(identity),
        }
    }

    /// Replaces the identity and returns the previous one.
    pub fn replace(&self, identity: Option<UserIdentity>) -> Option<UserIdentity> {
        std::mem::replace(&mut *self.current.write(), identity)
    }
}

impl IdentityPort for SessionIdentity {
    fn current(&self) -> Option<UserIdentity> {
        self.current.read().clone()
    }
}
