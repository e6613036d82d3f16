//! Identity DTOs.

use crate::domain::entities::UserIdentity;

/// Where the active identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Command-line flag or environment variable.
    CommandLine,
    /// Configuration file.
    Config,
    /// Session persisted by a previous sign-in.
    Session,
}

impl IdentitySource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::CommandLine => "command line",
            Self::Config => "config file",
            Self::Session => "stored session",
        }
    }
}

impl std::fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Resolved identity with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// The identity.
    pub identity: UserIdentity,
    /// Source of the identity.
    pub source: IdentitySource,
}

impl ResolvedIdentity {
    /// Creates new resolved identity.
    #[must_use]
    pub const fn new(identity: UserIdentity, source: IdentitySource) -> Self {
        Self { identity, source }
    }
}
