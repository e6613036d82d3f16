//! Identity resolution use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::dto::{IdentitySource, ResolvedIdentity};
use crate::domain::entities::{SESSION_IDENTITY_KEY, UserIdentity};
use crate::domain::ports::KeyValueStorePort;

/// Resolves the student identity from available sources.
pub struct ResolveIdentityUseCase {
    store: Arc<dyn KeyValueStorePort>,
}

impl ResolveIdentityUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    /// Resolves identity from CLI/env, config or stored session.
    ///
    /// Priority:
    /// 1. CLI/Env
    /// 2. Config file
    /// 3. Stored session
    ///
    /// Blank values are skipped. A store failure is treated as "no session".
    pub async fn execute(
        &self,
        cli_identity: Option<String>,
        config_identity: Option<String>,
    ) -> Option<ResolvedIdentity> {
        if let Some(identity) = cli_identity.and_then(UserIdentity::new) {
            info!(identity = %identity, "Using identity from command line / environment");
            return Some(ResolvedIdentity::new(identity, IdentitySource::CommandLine));
        }

        if let Some(identity) = config_identity.and_then(UserIdentity::new) {
            info!(identity = %identity, "Using identity from config file");
            return Some(ResolvedIdentity::new(identity, IdentitySource::Config));
        }

        debug!("Checking store for a saved session");
        match self.store.get(SESSION_IDENTITY_KEY).await {
            Ok(Some(bytes)) => {
                let stored = String::from_utf8_lossy(&bytes).into_owned();
                if let Some(identity) = UserIdentity::new(stored) {
                    info!(identity = %identity, "Using identity from stored session");
                    return Some(ResolvedIdentity::new(identity, IdentitySource::Session));
                }
                debug!("Stored session identity is blank");
            }
            Ok(None) => debug!("No stored session"),
            Err(e) => debug!(error = %e, "Failed to read stored session"),
        }

        debug!("No identity found in any source");
        None
    }
}
