// Data models: Rust structs that map to database rows.
//
// These are the types that flow through the application. They're separate
// from the database queries so the rewards engine can use them without
// depending on rusqlite directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a report as stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Waiting,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Waiting => "waiting",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
        }
    }

    /// Parse the stored string form. Unknown values are rejected rather
    /// than mapped to a default so a bad row never gets miscounted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "waiting" => Some(ReportStatus::Waiting),
            "in-progress" => Some(ReportStatus::InProgress),
            "resolved" => Some(ReportStatus::Resolved),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stray-animal incident report.
///
/// Only the fields the rewards engine reads are modelled here; photos,
/// location and species live with the hosted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    /// The user who claimed or resolved the report. Unset while waiting.
    #[serde(default)]
    pub volunteer_id: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// A freshly submitted report with no volunteer.
    pub fn new(id: impl Into<String>, reporter_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            reporter_id: reporter_id.into(),
            volunteer_id: None,
            status: ReportStatus::Waiting,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ReportStatus::Resolved
    }

    pub fn is_reported_by(&self, user_id: &str) -> bool {
        self.reporter_id == user_id
    }

    pub fn is_volunteered_by(&self, user_id: &str) -> bool {
        self.volunteer_id.as_deref() == Some(user_id)
    }
}

/// One entry in the append-only redemption ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionRecord {
    pub user_id: String,
    pub reward_id: String,
    pub amount: u64,
    pub redeemed_at: DateTime<Utc>,
}

/// Status shown to a viewer: the record status plus the local "seen" overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Waiting,
    Seen,
    InProgress,
    Resolved,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Waiting => "Waiting",
            DisplayStatus::Seen => "Seen",
            DisplayStatus::InProgress => "In Progress",
            DisplayStatus::Resolved => "Resolved",
        }
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
