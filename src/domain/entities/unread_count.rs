//! Unread count value object.

/// Number of announcements not present in the read set.
///
/// Always derived, never stored. The unsigned representation keeps it
/// non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnreadCount(u32);

impl UnreadCount {
    /// Zero unread announcements.
    pub const ZERO: Self = Self(0);

    /// Creates a count.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Creates a count from a collection size, saturating at `u32::MAX`.
    #[must_use]
    pub fn from_len(len: usize) -> Self {
        Self(u32::try_from(len).unwrap_or(u32::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns true if there is nothing unread.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for UnreadCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UnreadCount> for u32 {
    fn from(value: UnreadCount) -> Self {
        value.0
    }
}
