// Database trait: backend-agnostic async interface for all DB operations.
//
// This is the report record source the rewards engine reads from. It is the
// only async boundary in the crate: the engine itself runs once the records
// are in hand.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use super::models::{RedemptionRecord, Report};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Reports ---

    /// Save or replace a report record.
    async fn upsert_report(&self, report: &Report) -> Result<()>;

    /// Save a batch of reports atomically: either all land or none do.
    async fn upsert_reports(&self, reports: &[Report]) -> Result<()>;

    /// Load a single report by id.
    async fn get_report(&self, id: &str) -> Result<Option<Report>>;

    /// All reports, newest first.
    async fn list_reports(&self) -> Result<Vec<Report>>;

    /// (status, count) pairs for every status present.
    async fn count_reports_by_status(&self) -> Result<Vec<(String, i64)>>;

    // --- Redemption ledger ---

    /// Append a redemption and return its ledger row id.
    async fn record_redemption(&self, record: &RedemptionRecord) -> Result<i64>;

    /// A user's redemptions, oldest first.
    async fn get_redemptions(&self, user_id: &str) -> Result<Vec<RedemptionRecord>>;

    /// Number of redemptions recorded across all users.
    async fn redemption_count(&self) -> Result<i64>;

    // --- Seen overlay ---

    /// Mark a report as seen by a user.
    async fn mark_seen(&self, user_id: &str, report_id: &str) -> Result<()>;

    /// Report ids the user has marked as seen.
    async fn get_seen_reports(&self, user_id: &str) -> Result<HashSet<String>>;
}
