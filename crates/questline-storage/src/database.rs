// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;

use questline_core::QuestlineError;

/// Map a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> QuestlineError {
    QuestlineError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the single SQLite connection backing the chain store.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations. Parent directories are created if missing.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, QuestlineError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| QuestlineError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        // Connection::open surfaces rusqlite::Error directly.
        let conn = Connection::open(path)
            .await
            .map_err(|e| QuestlineError::Storage {
                source: Box::new(e),
            })?;

        // The boxed error type lets both pragma and refinery migration
        // errors flow out of the same closure.
        conn.call(
            move |conn| -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
                if wal_mode {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                }
                conn.pragma_update(None, "foreign_keys", "ON")?;
                conn.pragma_update(None, "busy_timeout", 5000)?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                crate::migrations::run_migrations(conn)?;
                Ok(())
            },
        )
        .await
        .map_err(|e| QuestlineError::Storage {
            source: match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                tokio_rusqlite::Error::ConnectionClosed => {
                    Box::new(tokio_rusqlite::Error::<rusqlite::Error>::ConnectionClosed)
                }
                tokio_rusqlite::Error::Close(c) => {
                    Box::new(tokio_rusqlite::Error::<rusqlite::Error>::Close(c))
                }
                other => other.to_string().into(),
            },
        })?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and shut down the connection's worker thread.
    pub async fn close(&self) -> Result<(), QuestlineError> {
        self.conn
            .call(|conn| {
                // wal_checkpoint returns a result row; query_row discards it.
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_row| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.clone().close().await.map_err(map_tr_err)?;
        debug!("database closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_runs_migrations() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("open_test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        assert!(db_path.exists());

        // Every table from the initial migration should be present.
        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let mut names = Vec::new();
                for row in rows {
                    names.push(row?);
                }
                Ok(names)
            })
            .await
            .unwrap();
        for table in [
            "users",
            "user_messages",
            "adventure_chains",
            "ai_messages",
            "turn_links",
            "generation_log",
        ] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_surfaces_storage_error_for_unusable_path() {
        let dir = tempdir().unwrap();
        // A directory is not openable as a database file.
        let err = Database::open(dir.path().to_str().unwrap(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, QuestlineError::Storage { .. }));
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_is_idempotent_across_restarts() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");

        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        db.close().await.unwrap();

        // Second open re-runs the migration runner against applied migrations.
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        db.close().await.unwrap();
    }
}
