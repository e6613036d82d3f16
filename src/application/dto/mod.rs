//! Data transfer objects for the application layer.

mod identity_dto;

pub use identity_dto::{IdentitySource, ResolvedIdentity};
