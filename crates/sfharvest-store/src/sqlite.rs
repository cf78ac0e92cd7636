//! SQLite-backed [`KeyedStore`]: one database file per channel.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use sfharvest_core::{sanitize_channel_name, NormalizedProduct};

use crate::keyed::{KeyedStore, Record};
use crate::{StoreError, MIGRATOR};

const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// A product record as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    pub id: String,
    pub record: Record,
    pub updated_at: DateTime<Utc>,
}

impl StoredProduct {
    /// Decodes the stored record as a [`NormalizedProduct`]. Extra stored
    /// fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if a required field is missing or has
    /// the wrong type.
    pub fn product(&self) -> Result<NormalizedProduct, StoreError> {
        serde_json::from_value(Value::Object(self.record.clone())).map_err(|source| {
            StoreError::Decode {
                id: self.id.clone(),
                source,
            }
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    record: String,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_stored(self) -> Result<StoredProduct, StoreError> {
        let record = decode_record(&self.id, &self.record)?;
        Ok(StoredProduct {
            id: self.id,
            record,
            updated_at: self.updated_at,
        })
    }
}

/// Product store for a single channel.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) `{db_dir}/{sanitized channel}.sqlite` and
    /// applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidChannelName`] for an empty channel name,
    /// [`StoreError::CreateDir`] if `db_dir` cannot be created, or a
    /// connection/migration error.
    pub async fn open(
        db_dir: impl AsRef<Path>,
        channel_name: &str,
        max_connections: u32,
    ) -> Result<Self, StoreError> {
        if sanitize_channel_name(channel_name).is_empty() {
            return Err(StoreError::InvalidChannelName(channel_name.to_owned()));
        }

        let db_dir = db_dir.as_ref();
        let path = Self::file_path(db_dir, channel_name);
        tokio::fs::create_dir_all(db_dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: db_dir.display().to_string(),
                source,
            })?;

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        MIGRATOR.run(&pool).await?;

        tracing::info!(channel_name, path = %path.display(), "opened product store");
        Ok(Self { pool })
    }

    /// Location of the store file for `channel_name` under `db_dir`.
    #[must_use]
    pub fn file_path(db_dir: &Path, channel_name: &str) -> PathBuf {
        db_dir.join(format!("{}.sqlite", sanitize_channel_name(channel_name)))
    }

    /// Opens with the default connection limit.
    ///
    /// # Errors
    ///
    /// See [`SqliteStore::open`].
    pub async fn open_default(
        db_dir: impl AsRef<Path>,
        channel_name: &str,
    ) -> Result<Self, StoreError> {
        Self::open(db_dir, channel_name, DEFAULT_MAX_CONNECTIONS).await
    }

    /// A private in-memory store. Single connection so every query sees the
    /// same database.
    ///
    /// # Errors
    ///
    /// Returns a connection or migration error.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        MIGRATOR.run(&pool).await?;
        Ok(Self { pool })
    }

    /// Reads one product by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure or an undecodable record.
    pub async fn load_product(&self, id: &str) -> Result<Option<StoredProduct>, StoreError> {
        sqlx::query_as::<_, ProductRow>(
            "SELECT id, record, updated_at FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(ProductRow::into_stored)
        .transpose()
    }

    /// Lists stored products, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on query failure or an undecodable record.
    pub async fn list_products(&self, limit: Option<u32>) -> Result<Vec<StoredProduct>, StoreError> {
        let limit = limit.map_or(-1, i64::from);
        sqlx::query_as::<_, ProductRow>(
            "SELECT id, record, updated_at FROM products \
             ORDER BY updated_at DESC, id ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ProductRow::into_stored)
        .collect()
    }

    /// Number of stored products.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlx`] on query failure.
    pub async fn count_products(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Closes the pool, flushing WAL contents to the database file.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl KeyedStore for SqliteStore {
    async fn get_or_default(&self, key: &str, default: Record) -> Result<Record, StoreError> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT record FROM products WHERE id = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        match stored {
            Some(text) => decode_record(key, &text),
            None => Ok(default),
        }
    }

    async fn put(
        &self,
        key: &str,
        record: &Record,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let text = serde_json::to_string(record).map_err(|source| StoreError::Encode {
            id: key.to_owned(),
            source,
        })?;
        sqlx::query(
            "INSERT INTO products (id, record, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET record = excluded.record, \
             updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(text)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn decode_record(id: &str, text: &str) -> Result<Record, StoreError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(StoreError::NotAnObject { id: id.to_owned() }),
        Err(source) => Err(StoreError::Decode {
            id: id.to_owned(),
            source,
        }),
    }
}
