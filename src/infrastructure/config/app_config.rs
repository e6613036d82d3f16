//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::refresh::SyncMode;

/// Application name used for platform directories.
pub const APP_NAME: &str = "noticeboard";
/// Qualifier used for platform directories.
pub const APP_QUALIFIER: &str = "com";
/// Organization used for platform directories.
pub const APP_ORGANIZATION: &str = "linuxmobile";

const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory holding the announcement store.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Student identifier to use instead of the stored session.
    #[serde(default)]
    pub student_id: Option<String>,

    /// Remote API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Synchronization configuration.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Badge configuration.
    #[serde(default)]
    pub badge: BadgeConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the portal API, including any path prefix such as `/api`.
    /// Without it only local mode is available.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Synchronization configuration.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Where passes get their inputs.
    #[serde(default)]
    pub mode: SyncMode,

    /// Seconds between timer-driven refreshes.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Refresh when the application returns to the foreground.
    #[serde(default = "default_true")]
    pub refresh_on_foreground: bool,

    /// Refresh when the badge's screen regains focus.
    #[serde(default = "default_true")]
    pub refresh_on_focus: bool,

    /// Skip timer refreshes while in the background.
    #[serde(default = "default_true")]
    pub pause_in_background: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mode: SyncMode::default(),
            poll_interval_secs: default_poll_interval_secs(),
            refresh_on_foreground: true,
            refresh_on_focus: true,
            pause_in_background: true,
        }
    }
}

impl SyncConfig {
    /// Polling interval, never shorter than one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS))
    }
}

/// Badge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    /// Counts above this value are shown as `<threshold>+`.
    #[serde(default = "default_overflow_threshold")]
    pub overflow_threshold: u32,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            overflow_threshold: default_overflow_threshold(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_overflow_threshold() -> u32 {
    9
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(data_dir) = args.data_dir {
            self.data_dir = Some(data_dir);
        }
        if let Some(student_id) = args.student_id {
            self.student_id = Some(student_id);
        }
        if let Some(base_url) = args.api_base_url {
            self.api.base_url = Some(base_url);
        }
        if let Some(mode) = args.mode {
            self.sync.mode = mode;
        }
        if let Some(poll_interval) = args.poll_interval {
            self.sync.poll_interval_secs = poll_interval;
        }
        if let Some(threshold) = args.overflow_threshold {
            self.badge.overflow_threshold = threshold;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("noticeboard.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            data_dir: None,
            student_id: None,
            api: ApiConfig::default(),
            sync: SyncConfig::default(),
            badge: BadgeConfig::default(),
        }
    }
}
