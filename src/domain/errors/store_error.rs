//! Persistent store error types.

use thiserror::Error;

/// Store error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("failed to read key {key}: {message}")]
    ReadFailed { key: String, message: String },

    #[error("failed to write key {key}: {message}")]
    WriteFailed { key: String, message: String },

    #[error("corrupt payload under key {key}: {message}")]
    Corrupt { key: String, message: String },

    #[error("failed to encode payload for key {key}: {message}")]
    Encode { key: String, message: String },
}

impl StoreError {
    /// Creates read failure error.
    #[must_use]
    pub fn read_failed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates write failure error.
    #[must_use]
    pub fn write_failed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates corrupt payload error.
    #[must_use]
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates encode error.
    #[must_use]
    pub fn encode(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns whether the stored bytes could not be decoded.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
