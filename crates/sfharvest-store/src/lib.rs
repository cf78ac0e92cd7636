//! Per-channel persistent product store.
//!
//! Records are keyed by listing id and merged on write; see [`merge_product`].

pub mod keyed;
pub mod sqlite;

use thiserror::Error;

pub use keyed::{merge_product, KeyedStore, Record};
pub use sqlite::{SqliteStore, StoredProduct};

// Path relative to crates/sfharvest-store/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("channel name is empty after sanitization: {0:?}")]
    InvalidChannelName(String),
    #[error("could not create store directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("record {id} is not a JSON object")]
    NotAnObject { id: String },
    #[error("could not encode record {id}: {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not decode stored record {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}
