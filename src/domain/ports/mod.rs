mod announcement_source_port;
mod identity_port;
mod key_value_store_port;
mod navigator_port;

pub use announcement_source_port::AnnouncementSourcePort;
pub use identity_port::IdentityPort;
pub use key_value_store_port::KeyValueStorePort;
pub use navigator_port::NavigatorPort;

#[cfg(test)]
pub use announcement_source_port::MockAnnouncementSourcePort;

#[cfg(test)]
pub mod mocks {
    pub use super::announcement_source_port::mock::ScriptedAnnouncementSource;
    pub use super::identity_port::mock::FixedIdentity;
    pub use super::key_value_store_port::mock::MockKeyValueStore;
    pub use super::navigator_port::mock::MockNavigator;
}
