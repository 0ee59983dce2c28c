// Database queries: CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::models::{RedemptionRecord, Report, ReportStatus};

// --- Reports ---

/// Insert a report or replace the stored copy with the same id.
pub fn upsert_report(conn: &Connection, report: &Report) -> Result<()> {
    conn.execute(
        "INSERT INTO reports (id, reporter_id, volunteer_id, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            reporter_id = ?2,
            volunteer_id = ?3,
            status = ?4,
            created_at = ?5,
            updated_at = ?6",
        params![
            report.id,
            report.reporter_id,
            report.volunteer_id,
            report.status.as_str(),
            report.created_at.to_rfc3339(),
            report.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

type ReportRow = (String, String, Option<String>, String, String, String);

/// Load a single report by id.
pub fn get_report(conn: &Connection, id: &str) -> Result<Option<Report>> {
    let mut stmt = conn.prepare(
        "SELECT id, reporter_id, volunteer_id, status, created_at, updated_at
         FROM reports WHERE id = ?1",
    )?;
    let row: Option<ReportRow> = stmt
        .query_row(params![id], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })
        .optional()?;

    row.map(report_from_row).transpose()
}

/// All reports, newest first (the dashboard's default ordering).
pub fn list_reports(conn: &Connection) -> Result<Vec<Report>> {
    let mut stmt = conn.prepare(
        "SELECT id, reporter_id, volunteer_id, status, created_at, updated_at
         FROM reports
         ORDER BY created_at DESC, id ASC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<ReportRow>>>()?;

    rows.into_iter().map(report_from_row).collect()
}

/// Count stored reports per status, for the status screen.
pub fn count_reports_by_status(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt =
        conn.prepare("SELECT status, COUNT(*) FROM reports GROUP BY status ORDER BY status")?;
    let counts = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<(String, i64)>>>()?;
    Ok(counts)
}

fn report_from_row(row: ReportRow) -> Result<Report> {
    let (id, reporter_id, volunteer_id, status, created_at, updated_at) = row;
    let status = ReportStatus::parse(&status)
        .with_context(|| format!("Report {id} has unknown status '{status}'"))?;
    Ok(Report {
        created_at: parse_timestamp(&created_at)
            .with_context(|| format!("Report {id} has a bad created_at"))?,
        updated_at: parse_timestamp(&updated_at)
            .with_context(|| format!("Report {id} has a bad updated_at"))?,
        id,
        reporter_id,
        volunteer_id,
        status,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

// --- Redemption ledger ---

/// Append a redemption to the ledger and return its row id.
pub fn insert_redemption(conn: &Connection, record: &RedemptionRecord) -> Result<i64> {
    let amount = i64::try_from(record.amount).context("Redemption amount out of range")?;
    conn.execute(
        "INSERT INTO redemptions (user_id, reward_id, amount, redeemed_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            record.user_id,
            record.reward_id,
            amount,
            record.redeemed_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// A user's redemptions in the order they were made.
pub fn get_redemptions(conn: &Connection, user_id: &str) -> Result<Vec<RedemptionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, reward_id, amount, redeemed_at
         FROM redemptions
         WHERE user_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(user_id, reward_id, amount, redeemed_at)| {
            Ok(RedemptionRecord {
                amount: u64::try_from(amount)
                    .with_context(|| format!("Negative redemption amount for {user_id}"))?,
                redeemed_at: parse_timestamp(&redeemed_at)?,
                user_id,
                reward_id,
            })
        })
        .collect()
}

/// Total number of ledger rows, across all users.
pub fn redemption_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM redemptions", [], |row| row.get(0))?;
    Ok(count)
}

// --- Seen overlay ---

/// Mark a report as seen by a user. Marking twice is a no-op.
pub fn mark_seen(conn: &Connection, user_id: &str, report_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO seen_reports (user_id, report_id) VALUES (?1, ?2)",
        params![user_id, report_id],
    )?;
    Ok(())
}

/// The set of report ids a user has marked as seen.
pub fn get_seen_reports(conn: &Connection, user_id: &str) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT report_id FROM seen_reports WHERE user_id = ?1")?;
    let ids = stmt
        .query_map(params![user_id], |row| row.get(0))?
        .collect::<rusqlite::Result<HashSet<String>>>()?;
    Ok(ids)
}

// rusqlite's optional() helper: converts "no rows" into None
use rusqlite::OptionalExtension;
