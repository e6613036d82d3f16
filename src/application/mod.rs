//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Reconciliation services and the refresh scheduler.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{IdentitySource, ResolvedIdentity};
pub use services::{
    AnnouncementRepository, CountSource, PassResult, RefreshScheduler, SchedulerConfig,
    SessionIdentity, TriggerOutcome, UnreadService,
};
pub use use_cases::{ResolveIdentityUseCase, SignInUseCase, SignOutUseCase};
