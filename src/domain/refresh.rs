//! Refresh scheduling vocabulary.

/// Lifecycle state of a refresh scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Waiting for the next trigger.
    #[default]
    Idle,
    /// A reconciliation pass is in flight.
    Refreshing,
    /// Torn down; every trigger and late result is ignored.
    Stopped,
}

/// Reason a reconciliation pass was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The scheduler was started.
    Activation,
    /// The polling interval elapsed.
    Timer,
    /// The application returned to the foreground.
    Foreground,
    /// The consuming screen regained focus.
    FocusGained,
    /// The user opened the notification surface.
    UserAction,
}

impl std::fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Activation => write!(f, "activation"),
            Self::Timer => write!(f, "timer"),
            Self::Foreground => write!(f, "foreground"),
            Self::FocusGained => write!(f, "focus"),
            Self::UserAction => write!(f, "user"),
        }
    }
}

/// Application lifecycle and focus notifications fed to a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The application became active.
    Foreground,
    /// The application moved to the background.
    Background,
    /// The screen hosting the badge gained focus.
    FocusGained,
    /// The screen hosting the badge lost focus.
    FocusLost,
}

/// Where a reconciliation pass gets its inputs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Cached announcement set diffed against the read set; no network.
    #[default]
    Local,
    /// Full announcement list fetched remotely, diffed locally.
    List,
    /// Precomputed unread count fetched remotely.
    Count,
}

impl SyncMode {
    /// Returns true if this mode talks to a remote source.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::List | Self::Count)
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::List => write!(f, "list"),
            Self::Count => write!(f, "count"),
        }
    }
}
