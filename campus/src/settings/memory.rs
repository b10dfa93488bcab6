//! In-process settings backend.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{SettingsBackend, SettingsError};

/// Settings kept in memory for the lifetime of the process.
///
/// Used when no settings database can be opened, and by tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.values.get(key).map(|v| v.clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        self.values.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        let mut keys: Vec<String> = self
            .values
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_missing_key_and_sorted_prefix() {
        let backend = MemoryBackend::new();
        backend.set_bytes("filters.staff", vec![1]).await.unwrap();
        backend.set_bytes("filters.degrees", vec![2]).await.unwrap();
        backend.set_bytes("config.locale", vec![3]).await.unwrap();

        backend.delete("filters.rooms").await.unwrap();

        assert_eq!(
            backend.keys_with_prefix("filters.").await.unwrap(),
            vec!["filters.degrees".to_string(), "filters.staff".to_string()]
        );
    }
}
