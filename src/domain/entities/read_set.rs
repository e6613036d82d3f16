//! Read set entity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::AnnouncementId;

/// Identifiers of the announcements a user has acknowledged.
///
/// Entries are only ever added; the whole set is discarded on sign-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadSet {
    ids: BTreeSet<AnnouncementId>,
}

impl ReadSet {
    /// Creates an empty read set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the announcement has been read.
    #[must_use]
    pub fn contains(&self, id: &AnnouncementId) -> bool {
        self.ids.contains(id)
    }

    /// Number of acknowledged announcements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing has been read yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if every entry of `other` is also in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        self.ids.is_superset(&other.ids)
    }
}

impl FromIterator<AnnouncementId> for ReadSet {
    fn from_iter<T: IntoIterator<Item = AnnouncementId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<AnnouncementId> for ReadSet {
    fn extend<T: IntoIterator<Item = AnnouncementId>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_list() {
        let set: ReadSet = ["b", "a"].into_iter().map(AnnouncementId::from).collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_accepts_mixed_id_types() {
        let set: ReadSet = serde_json::from_str(r#"["a1", 7]"#).unwrap();
        assert!(set.contains(&AnnouncementId::from("a1")));
        assert!(set.contains(&AnnouncementId::from("7")));
    }
}
