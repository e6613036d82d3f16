//! User identity value object.

use std::fmt;

const ANNOUNCEMENTS_KEY_PREFIX: &str = "announcements";
const READ_ANNOUNCEMENTS_KEY_PREFIX: &str = "readAnnouncements";

/// Store key holding the signed-in student identifier.
pub const SESSION_IDENTITY_KEY: &str = "student_id";

/// External key (a student identifier) that scopes announcements and read state.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserIdentity {
    value: String,
}

impl UserIdentity {
    /// Creates an identity, rejecting blank values.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return None;
        }

        Some(Self { value })
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Store key of the cached announcement set.
    #[must_use]
    pub fn announcements_key(&self) -> String {
        format!("{ANNOUNCEMENTS_KEY_PREFIX}:{}", self.value)
    }

    /// Store key of the read set.
    #[must_use]
    pub fn read_announcements_key(&self) -> String {
        format!("{READ_ANNOUNCEMENTS_KEY_PREFIX}:{}", self.value)
    }
}

impl fmt::Debug for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserIdentity").field(&self.value).finish()
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identity_is_rejected() {
        assert!(UserIdentity::new("").is_none());
        assert!(UserIdentity::new("   ").is_none());
    }

    #[test]
    fn test_identity_is_trimmed() {
        let identity = UserIdentity::new("  S-1024 \n").unwrap();
        assert_eq!(identity.as_str(), "S-1024");
    }

    #[test]
    fn test_store_keys() {
        let identity = UserIdentity::new("1024").unwrap();
        assert_eq!(identity.announcements_key(), "announcements:1024");
        assert_eq!(identity.read_announcements_key(), "readAnnouncements:1024");
    }
}
