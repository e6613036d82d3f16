//! Navigation targets for headless runs.

use tracing::info;

use crate::domain::ports::NavigatorPort;

/// Navigator that records the request in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl NavigatorPort for LogNavigator {
    fn open_notifications(&self) {
        info!("Opening notifications");
    }
}
