//! Persistence module split across logical submodules.

mod connection;
mod records;

use std::io;

use thiserror::Error;

pub use connection::{open_db, open_db_in_memory, SCHEMA_VERSION};
pub use records::{fetch_all, RecordFeed, RecordStore};

pub type DbResult<T> = Result<T, DbError>;

/// Failures surfaced by the record store.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to prepare data directory: {0}")]
    Io(#[from] io::Error),
    #[error("database schema version {found} does not match supported version {supported}")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    #[error("record already has id {0}; only unsaved records can be inserted")]
    IdAlreadyAssigned(i64),
}
