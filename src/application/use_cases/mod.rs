//! Use case implementations.

mod resolve_identity_use_case;
mod sign_in_use_case;
mod sign_out_use_case;

pub use resolve_identity_use_case::ResolveIdentityUseCase;
pub use sign_in_use_case::SignInUseCase;
pub use sign_out_use_case::SignOutUseCase;
