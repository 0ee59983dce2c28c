// Database schema: table creation and migrations.
//
// We use a simple version-based migration approach: a `schema_version` table
// tracks which migrations have run, and each migration is a function that
// executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent and safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Report records mirrored from the hosted backend
        CREATE TABLE IF NOT EXISTS reports (
            id TEXT PRIMARY KEY,
            reporter_id TEXT NOT NULL,
            volunteer_id TEXT,                 -- null while waiting
            status TEXT NOT NULL,              -- waiting / in-progress / resolved
            created_at TEXT NOT NULL,          -- RFC 3339
            updated_at TEXT NOT NULL           -- RFC 3339
        );

        -- Append-only redemption ledger
        CREATE TABLE IF NOT EXISTS redemptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            reward_id TEXT NOT NULL,
            amount INTEGER NOT NULL,
            redeemed_at TEXT NOT NULL          -- RFC 3339
        );

        -- Index for counting a user's submitted reports
        CREATE INDEX IF NOT EXISTS idx_reports_reporter
            ON reports(reporter_id);

        -- Index for counting a user's rescues
        CREATE INDEX IF NOT EXISTS idx_reports_volunteer
            ON reports(volunteer_id);

        -- Index for summing a user's redemptions
        CREATE INDEX IF NOT EXISTS idx_redemptions_user
            ON redemptions(user_id);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: per-user "seen" overlay. Marking a report as seen is a
    // viewer-local state and never touches the report record itself.
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "CREATE TABLE seen_reports (
                user_id TEXT NOT NULL,
                report_id TEXT NOT NULL,
                seen_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (user_id, report_id)
            );",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
