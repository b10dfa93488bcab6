//! SQLite settings backend with in-memory cache.

use std::path::Path;

use async_sqlite::Client;
use async_trait::async_trait;
use dashmap::DashMap;

use super::{SettingsBackend, SettingsError};

/// SQLite-backed settings storage with DashMap cache.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Open (or create) the settings database at the given path.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let client = async_sqlite::ClientBuilder::new()
            .path(path)
            .open()
            .await?;

        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS settings (
                        key TEXT PRIMARY KEY,
                        value BLOB NOT NULL
                    )",
                    [],
                )
            })
            .await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let key_owned = key.to_string();
        let result = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?")?;
                let mut rows = stmt.query([&key_owned])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, Vec<u8>>(0)?)),
                    None => Ok(None),
                }
            })
            .await?;

        if let Some(ref value) = result {
            self.cache.insert(key.to_string(), value.clone());
        }

        Ok(result)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        let key_owned = key.to_string();
        let value_clone = value.clone();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO settings (key, value) VALUES (?, ?)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    rusqlite::params![&key_owned, &value_clone],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        let key_owned = key.to_string();

        self.client
            .conn(move |conn| conn.execute("DELETE FROM settings WHERE key = ?", [&key_owned]))
            .await?;

        self.cache.remove(key);

        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        // Literal prefix match: `_` and `%` are not wildcards here
        let prefix = prefix.to_string();
        self.client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT key FROM settings WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
                )?;
                let rows = stmt.query_map([&prefix], |row| row.get(0))?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await
            .map_err(SettingsError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.db");

        let backend = SqliteBackend::new(&path).await.unwrap();
        backend.set_bytes("config.locale", b"es".to_vec()).await.unwrap();
        backend.set_bytes("config.locale", b"en".to_vec()).await.unwrap();
        drop(backend);

        let reopened = SqliteBackend::new(&path).await.unwrap();
        assert_eq!(
            reopened.get_bytes("config.locale").await.unwrap(),
            Some(b"en".to_vec())
        );
        assert_eq!(reopened.get_bytes("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prefix_listing_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::new(dir.path().join("settings.db"))
            .await
            .unwrap();

        backend.set_bytes("filters.schools", vec![1]).await.unwrap();
        backend.set_bytes("filters.degrees", vec![2]).await.unwrap();
        backend.set_bytes("filters_x", vec![3]).await.unwrap();
        backend.set_bytes("config.page_size", vec![4]).await.unwrap();

        assert_eq!(
            backend.keys_with_prefix("filters.").await.unwrap(),
            vec!["filters.degrees".to_string(), "filters.schools".to_string()]
        );

        backend.delete("filters.schools").await.unwrap();
        assert_eq!(backend.get_bytes("filters.schools").await.unwrap(), None);
        assert_eq!(
            backend.keys_with_prefix("filters.").await.unwrap(),
            vec!["filters.degrees".to_string()]
        );
    }
}
