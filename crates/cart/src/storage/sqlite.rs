use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::runtime::Runtime;

use super::{CartStorage, StorageError};

/// SQLite-backed key/value slots.
///
/// The storage owns a single-threaded Tokio runtime and blocks on it for
/// every call, which keeps the [`CartStorage`] API synchronous. It must not be
/// used from inside another async runtime.
#[derive(Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
    runtime: Runtime,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::connect(options)
    }

    /// Private in-memory database (tests/dev).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options)
    }

    fn connect(options: SqliteConnectOptions) -> Result<Self, StorageError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StorageError::Runtime(e.to_string()))?;

        let pool = runtime
            .block_on(async {
                // One long-lived connection: an in-memory database only lives
                // as long as its connection.
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
                    .context("failed to create SQLite pool for cart storage")?;

                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS kv_store (
                        key        TEXT PRIMARY KEY,
                        value      TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    )
                    "#,
                )
                .execute(&pool)
                .await
                .context("failed to create kv_store table")?;

                Ok::<_, anyhow::Error>(pool)
            })
            .map_err(|e| StorageError::Database(format!("{e:#}")))?;

        Ok(Self { pool, runtime })
    }

    /// When the slot under `key` was last written (RFC 3339).
    pub fn updated_at(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = self.runtime.block_on(
            sqlx::query("SELECT updated_at FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool),
        )?;

        match row {
            Some(row) => Ok(Some(row.try_get("updated_at")?)),
            None => Ok(None),
        }
    }
}

impl Drop for SqliteStorage {
    fn drop(&mut self) {
        // Close connections while the runtime that owns them is still alive.
        self.runtime.block_on(self.pool.close());
    }
}

impl CartStorage for SqliteStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = self.runtime.block_on(
            sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool),
        )?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();

        self.runtime.block_on(
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key)
                DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&self.pool),
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.runtime.block_on(
            sqlx::query("DELETE FROM kv_store WHERE key = ?1")
                .bind(key)
                .execute(&self.pool),
        )?;
        Ok(())
    }
}
