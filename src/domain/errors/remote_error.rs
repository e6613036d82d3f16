//! Remote source error types.

use thiserror::Error;

/// Remote source error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum RemoteError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("malformed response body: {message}")]
    MalformedResponse { message: String },

    #[error("remote source unavailable: {message}")]
    Unavailable { message: String },
}

impl RemoteError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Unavailable { .. })
    }

    /// Returns whether the server answered with a non-success status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}
