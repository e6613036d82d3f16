pub mod announcement_repository;
pub mod reconciliation;
pub mod refresh_scheduler;
pub mod session_identity;
pub mod unread_service;

pub use announcement_repository::AnnouncementRepository;
pub use refresh_scheduler::{RefreshScheduler, SchedulerConfig, TriggerOutcome};
pub use session_identity::SessionIdentity;
pub use unread_service::{CountSource, PassResult, UnreadService};
