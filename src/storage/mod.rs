//! Storage module for persisting the crawl frontier
//!
//! The SQLite-backed frontier keeps every discovered URL and whether it has
//! been handed out, so an interrupted crawl can resume where it stopped.

mod schema;
mod sqlite;

pub use sqlite::SqliteFrontier;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
