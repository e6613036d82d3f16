//! Announcement entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a server-originated announcement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnouncementId(#[serde(with = "crate::domain::serde_utils::string_or_number")] String);

impl AnnouncementId {
    /// Creates an identifier from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnouncementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AnnouncementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A server-originated notification item.
///
/// Everything except the identifier and creation time is kept as an opaque
/// payload; the badge never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Announcement ID.
    pub id: AnnouncementId,
    /// Creation timestamp, when the source provides one.
    #[serde(
        default,
        rename = "createdAt",
        alias = "created_at",
        with = "crate::domain::serde_utils::lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Remaining fields, untouched.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Announcement {
    /// Creates an announcement with an empty payload.
    #[must_use]
    pub fn new(id: impl Into<AnnouncementId>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            payload: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_id_and_payload() {
        let json = r#"{"id": 42, "title": "Orientation", "created_at": "2024-03-01T08:00:00Z"}"#;
        let announcement: Announcement = serde_json::from_str(json).unwrap();

        assert_eq!(announcement.id.as_str(), "42");
        assert!(announcement.created_at.is_some());
        assert_eq!(
            announcement.payload.get("title"),
            Some(&serde_json::Value::String("Orientation".to_string()))
        );
    }

    #[test]
    fn test_missing_created_at_is_allowed() {
        let announcement: Announcement = serde_json::from_str(r#"{"id": "a1"}"#).unwrap();
        assert_eq!(announcement.id, AnnouncementId::from("a1"));
        assert!(announcement.created_at.is_none());
        assert!(announcement.payload.is_empty());
    }
}
