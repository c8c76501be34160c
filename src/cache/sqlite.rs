use super::KeyValueStore;
use crate::error::{PromptcastError, Result};
use anyhow::Context;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Single-database store
///
/// Keeps every record in one `session_cache` table. The database file and
/// its parent directory are created on first write.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Store using the database file at `db_path`
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Store using `sessions.db` inside `dir`
    pub fn new_in_dir(dir: &Path) -> Self {
        Self::new_with_path(dir.join("sessions.db"))
    }

    /// Path of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Opens the database, creating file and schema as needed
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| PromptcastError::Storage(e.to_string()))?;
        }

        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| PromptcastError::Storage(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS session_cache (
                key TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| PromptcastError::Storage(e.to_string()))?;

        Ok(conn)
    }

    /// Opens the database only if it already exists
    fn open_existing(&self) -> Result<Option<Connection>> {
        if self.db_path.exists() {
            self.open().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(conn) = self.open_existing()? else {
            return Ok(None);
        };

        conn.query_row(
            "SELECT session_id FROM session_cache WHERE key = ?",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .context("Failed to query cache record")
        .map_err(|e| PromptcastError::Storage(e.to_string()).into())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO session_cache (key, session_id, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                session_id = excluded.session_id,
                updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .context("Failed to write cache record")
        .map_err(|e| PromptcastError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let Some(conn) = self.open_existing()? else {
            return Ok(false);
        };

        let removed = conn
            .execute("DELETE FROM session_cache WHERE key = ?", params![key])
            .context("Failed to delete cache record")
            .map_err(|e| PromptcastError::Storage(e.to_string()))?;
        Ok(removed > 0)
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let Some(conn) = self.open_existing()? else {
            return Ok(Vec::new());
        };

        let mut stmt = conn
            .prepare("SELECT key FROM session_cache ORDER BY updated_at DESC")
            .context("Failed to prepare statement")
            .map_err(|e| PromptcastError::Storage(e.to_string()))?;

        let keys: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("Failed to query cache keys")
            .map_err(|e| PromptcastError::Storage(e.to_string()))?
            .flatten()
            .collect();

        Ok(keys)
    }
}
