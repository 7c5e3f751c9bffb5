use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{CredentialStore, StorageError};

use super::SqliteRepository;

fn conn(err: sqlx::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl CredentialStore for SqliteRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM credentials WHERE key = ?1")
            .bind(key)
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO credentials (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM credentials WHERE key = ?1")
            .bind(key)
            .execute(self.pool())
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn clear(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(conn)?;
        for key in keys {
            sqlx::query("DELETE FROM credentials WHERE key = ?1")
                .bind(*key)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
