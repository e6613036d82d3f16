//! Presentation layer with the badge and its navigation target.

/// Unread badge.
pub mod badge;
/// Navigation adapters.
pub mod navigator;

pub use badge::{BadgePresenter, DEFAULT_OVERFLOW_THRESHOLD, badge_label};
pub use navigator::LogNavigator;
