// Database layer: local SQLite storage for report records, the redemption
// ledger, and the per-user "seen" overlay.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever STRAYSAVER_DB_PATH points
// (defaults to ./straysaver.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use traits::Database;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Open (or create) the database and run migrations.
///
/// This is the main entry point, called by `straysaver init` and by any
/// command that needs database access.
pub fn initialize(db_path: &str) -> Result<Connection> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing database (fails if it doesn't exist yet).
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run `straysaver init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Pick up migrations added since the file was created
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Create the database file if needed and wrap it behind the Database trait.
pub fn initialize_sqlite(db_path: &str) -> Result<Arc<dyn Database>> {
    let conn = initialize(db_path)?;
    Ok(Arc::new(sqlite::SqliteDatabase::new(conn)))
}

/// Open an existing database file behind the Database trait.
pub fn open_sqlite(db_path: &str) -> Result<Arc<dyn Database>> {
    let conn = open(db_path)?;
    Ok(Arc::new(sqlite::SqliteDatabase::new(conn)))
}

/// Open the database if it has been initialized, or `None` if the file is
/// missing. For commands that still have something to show without it.
pub fn open_sqlite_if_exists(db_path: &str) -> Result<Option<Arc<dyn Database>>> {
    if !Path::new(db_path).exists() {
        return Ok(None);
    }
    open_sqlite(db_path).map(Some)
}

/// A throwaway in-memory database with the full schema, for tests and dry runs.
pub fn open_in_memory() -> Result<Arc<dyn Database>> {
    let conn = Connection::open_in_memory()?;
    schema::create_tables(&conn)?;
    Ok(Arc::new(sqlite::SqliteDatabase::new(conn)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("straysaver-{}-{name}.db", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_missing_database_is_none() {
        let path = scratch_path("missing");
        assert!(open_sqlite_if_exists(&path).unwrap().is_none());
        assert!(open_sqlite(&path).is_err());
        assert!(!Path::new(&path).exists());
    }

    #[tokio::test]
    async fn test_initialized_database_opens() {
        let path = scratch_path("present");
        initialize_sqlite(&path).unwrap();

        let db = open_sqlite_if_exists(&path).unwrap().unwrap();
        assert!(db.list_reports().await.unwrap().is_empty());

        drop(db);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{path}{suffix}"));
        }
    }
}
