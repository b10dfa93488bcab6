//! Settings system for typed key-value storage.

mod backend;
mod memory;
mod sqlite;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(bincode::Error),
    #[error("deserialization error: {0}")]
    Deserialization(bincode::Error),
}

/// Typed settings provider.
///
/// Wraps a `SettingsBackend` with typed serialization via bincode.
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl std::fmt::Debug for SettingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsProvider").finish_non_exhaustive()
    }
}

impl SettingsProvider {
    /// Create a new settings provider with the given backend.
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Provider over a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Get a typed value for a key.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        match self.backend.get_bytes(key).await? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(SettingsError::Deserialization)?,
            )),
            None => Ok(None),
        }
    }

    /// Get a typed value for a key, returning a default if not found.
    pub async fn get_or<T: DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, SettingsError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Set a typed value for a key.
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(SettingsError::Serialization)?;
        self.backend.set_bytes(key, bytes).await
    }

    /// Delete a key.
    pub async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.delete(key).await
    }

    /// Get all keys matching a prefix.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        self.backend.keys_with_prefix(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_typed_round_trip() {
        let settings = SettingsProvider::in_memory();

        settings.set("config.page_size", &25usize).await.unwrap();
        settings.set("config.locale", &"es".to_string()).await.unwrap();

        assert_eq!(
            settings.get::<usize>("config.page_size").await.unwrap(),
            Some(25)
        );
        assert_eq!(
            settings.get_or("config.locale", String::new()).await.unwrap(),
            "es"
        );
        assert_eq!(settings.get_or("config.missing", 7u32).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_wrong_type_is_deserialization_error() {
        let settings = SettingsProvider::in_memory();
        settings.set("flag", &true).await.unwrap();

        let err = settings.get::<String>("flag").await.unwrap_err();
        assert!(matches!(err, SettingsError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_delete_and_prefix() {
        let settings = SettingsProvider::in_memory();
        settings.set("filters.staff", &1u8).await.unwrap();
        settings.set("filters.schools", &2u8).await.unwrap();
        settings.set("config.locale", &3u8).await.unwrap();

        assert_eq!(
            settings.keys_with_prefix("filters.").await.unwrap(),
            vec!["filters.schools".to_string(), "filters.staff".to_string()]
        );

        settings.delete("filters.staff").await.unwrap();
        assert_eq!(settings.get::<u8>("filters.staff").await.unwrap(), None);
    }
}
