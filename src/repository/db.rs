//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection handle
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Connection>>,
}

impl DbState {
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}

/// Open (or create) the database at `db_path` and run migrations.
/// `":memory:"` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let path_str = db_path
        .to_str()
        .ok_or_else(|| DomainError::InvalidInput("Invalid DB path".to_string()))?;

    if let Some(parent) = db_path.parent() {
        if path_str != ":memory:" && !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path_str)?;
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;

    run_migrations(&conn)?;
    log::info!("database ready at {}", path_str);

    Ok(DbState {
        conn: Arc::new(Mutex::new(conn)),
    })
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS dreams (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            dream_text TEXT NOT NULL,
            interpretation TEXT NOT NULL,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_dreams_user_created ON dreams(user_id, created_at DESC)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS dream_symbols (
            symbol_name TEXT PRIMARY KEY,
            category TEXT NOT NULL,
            meanings TEXT NOT NULL DEFAULT '{\"positive\":[],\"negative\":[]}'
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Check if a column exists in a table
    fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
        let query = format!("PRAGMA table_info({})", table);
        let Ok(mut stmt) = conn.prepare(&query) else {
            return false;
        };
        let found = match stmt.query_map([], |row| row.get::<_, String>(1)) {
            Ok(rows) => rows.filter_map(|r| r.ok()).any(|name| name == column),
            Err(_) => false,
        };
        found
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dreams.db");
        init_db(&path).await.expect("first open");
        let state = init_db(&path).await.expect("second open");
        let conn = state.connection();
        let conn = conn.lock().await;
        assert!(column_exists(&conn, "dream_symbols", "meanings"));
        assert!(column_exists(&conn, "dreams", "is_favorite"));
    }

    #[tokio::test]
    async fn test_in_memory() {
        let state = init_db(&PathBuf::from(":memory:")).await.expect("open");
        let conn = state.connection();
        let conn = conn.lock().await;
        assert!(!column_exists(&conn, "dreams", "missing"));
    }
}
