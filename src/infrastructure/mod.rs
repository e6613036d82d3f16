//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// HTTP announcement source.
pub mod remote;
/// Key/value storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, Command, LogLevel, StorageManager};
pub use remote::HttpAnnouncementSource;
pub use storage::FileKeyValueStore;
