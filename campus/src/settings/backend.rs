//! Byte store behind the settings provider.

use async_trait::async_trait;

use super::SettingsError;

/// Raw key/value storage for the console's persisted state.
///
/// Keys are dotted paths: `config.*` holds the [`CampusConfig`] fields and
/// `filters.<screen>` the active filters saved for one screen. Values are
/// opaque bincode blobs written by [`SettingsProvider`].
///
/// [`CampusConfig`]: crate::config::CampusConfig
/// [`SettingsProvider`]: super::SettingsProvider
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    /// Insert or overwrite `key`.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError>;

    /// Remove `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<(), SettingsError>;

    /// Keys starting with `prefix`, sorted. The prefix is matched literally,
    /// so `filters.` lists every screen with saved filters.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError>;
}
