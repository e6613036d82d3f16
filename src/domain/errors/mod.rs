//! Domain error types.

mod remote_error;
mod store_error;

pub use remote_error::RemoteError;
pub use store_error::StoreError;
