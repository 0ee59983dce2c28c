// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Send.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{RedemptionRecord, Report};
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn upsert_report(&self, report: &Report) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::upsert_report(&conn, report)
    }

    async fn upsert_reports(&self, reports: &[Report]) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        for report in reports {
            super::queries::upsert_report(&tx, report)?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn get_report(&self, id: &str) -> Result<Option<Report>> {
        let conn = self.conn.lock().await;
        super::queries::get_report(&conn, id)
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let conn = self.conn.lock().await;
        super::queries::list_reports(&conn)
    }

    async fn count_reports_by_status(&self) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock().await;
        super::queries::count_reports_by_status(&conn)
    }

    async fn record_redemption(&self, record: &RedemptionRecord) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::insert_redemption(&conn, record)
    }

    async fn get_redemptions(&self, user_id: &str) -> Result<Vec<RedemptionRecord>> {
        let conn = self.conn.lock().await;
        super::queries::get_redemptions(&conn, user_id)
    }

    async fn redemption_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::redemption_count(&conn)
    }

    async fn mark_seen(&self, user_id: &str, report_id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::mark_seen(&conn, user_id, report_id)
    }

    async fn get_seen_reports(&self, user_id: &str) -> Result<HashSet<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_seen_reports(&conn, user_id)
    }
}
