//! SQLite frontier implementation

use crate::crawler::Frontier;
use crate::storage::schema::initialize_schema;
use crate::storage::StorageResult;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Persistent FIFO frontier
///
/// URLs are handed out in discovery order. A URL is marked fetched when it
/// is handed out and is never handed out again, including after reopening
/// the database.
pub struct SqliteFrontier {
    conn: Connection,
}

impl SqliteFrontier {
    /// Opens or creates a frontier database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteFrontier)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory frontier
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Removes every URL, fetched or not
    pub fn clear(&mut self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM frontier", [])?;
        Ok(())
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl Frontier for SqliteFrontier {
    fn has_next(&self) -> StorageResult<bool> {
        Ok(self.len()? > 0)
    }

    fn next_url(&mut self) -> StorageResult<Option<String>> {
        let tx = self.conn.transaction()?;

        let next = tx
            .query_row(
                "SELECT id, url FROM frontier WHERE fetched_at IS NULL ORDER BY id ASC LIMIT 1",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((id, url)) = next else {
            return Ok(None);
        };

        tx.execute(
            "UPDATE frontier SET fetched_at = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), id],
        )?;
        tx.commit()?;

        Ok(Some(url))
    }

    fn add_url(&mut self, url: &str) -> StorageResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO frontier (url, discovered_at) VALUES (?1, ?2)",
            params![url, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted == 1)
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.count("SELECT COUNT(*) FROM frontier WHERE fetched_at IS NULL")? as usize)
    }

    fn fetched(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM frontier WHERE fetched_at IS NOT NULL")
    }
}
