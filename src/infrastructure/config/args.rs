use super::app_config::LogLevel;
use crate::domain::refresh::SyncMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "noticeboard",
    version,
    about = "Keeps the unread announcement badge in sync",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Directory holding the announcement store.
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Student identifier.
    #[arg(long, env = "NOTICEBOARD_STUDENT_ID")]
    pub student_id: Option<String>,

    /// Base URL of the portal API.
    #[arg(long, env = "NOTICEBOARD_API_BASE_URL", value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Synchronization mode.
    #[arg(long, value_enum)]
    pub mode: Option<SyncMode>,

    /// Seconds between refreshes.
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Counts above this value are shown as `<threshold>+`.
    #[arg(long, value_name = "N")]
    pub overflow_threshold: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do once configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Keep the badge refreshed until interrupted.
    #[default]
    Watch,
    /// Run one reconciliation pass and print the count.
    Count,
    /// Mark every known announcement as read.
    MarkRead,
    /// Sign out and forget this identity's announcements.
    SignOut,
}
