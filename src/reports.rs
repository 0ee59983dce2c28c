// Report lifecycle helpers: status transitions, batch validation, the
// dashboard's list tabs, and the "seen" overlay.
//
// The rewards engine trusts its input. Validation happens once, where
// records enter the system, and a bad record rejects the whole batch so
// nothing gets silently miscounted.

use std::collections::HashSet;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};

use crate::db::models::{DisplayStatus, Report, ReportStatus};

/// Move a report to a new status on behalf of a volunteer.
///
/// Claiming (`InProgress`) or resolving sets the volunteer to the acting
/// user. Moving back to `Waiting` releases the volunteer so the record never
/// carries a volunteer while waiting.
///
/// Once a volunteer holds a report, only they can move it, and a resolved
/// report is final. Rescue credit never changes hands.
pub fn transition(
    report: &mut Report,
    status: ReportStatus,
    actor_id: &str,
    at: DateTime<Utc>,
) -> Result<()> {
    if actor_id.is_empty() {
        bail!("A signed-in user is required to update report {}", report.id);
    }
    if report.is_resolved() {
        bail!("Report {} is already resolved", report.id);
    }
    if let Some(volunteer) = report.volunteer_id.as_deref() {
        if volunteer != actor_id {
            bail!("Report {} is already claimed by {volunteer}", report.id);
        }
    }

    report.status = status;
    report.volunteer_id = match status {
        ReportStatus::Waiting => None,
        ReportStatus::InProgress | ReportStatus::Resolved => Some(actor_id.to_string()),
    };
    report.updated_at = at;
    Ok(())
}

/// Check one record against the data-model invariants.
pub fn validate(report: &Report) -> Result<()> {
    if report.id.trim().is_empty() {
        bail!("Report has an empty id");
    }
    if report.reporter_id.trim().is_empty() {
        bail!("Report {} has no reporter", report.id);
    }
    if let Some(volunteer) = &report.volunteer_id {
        if volunteer.trim().is_empty() {
            bail!("Report {} has an empty volunteer id", report.id);
        }
        if report.status == ReportStatus::Waiting {
            bail!("Report {} is waiting but already has a volunteer", report.id);
        }
    }
    if report.updated_at < report.created_at {
        bail!("Report {} was updated before it was created", report.id);
    }
    Ok(())
}

/// Validate a whole batch. The first bad record fails the batch.
pub fn validate_batch(reports: &[Report]) -> Result<()> {
    let mut ids = HashSet::with_capacity(reports.len());
    for report in reports {
        validate(report)?;
        if !ids.insert(report.id.as_str()) {
            bail!("Duplicate report id {} in batch", report.id);
        }
    }
    Ok(())
}

/// The dashboard's list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportTab {
    #[default]
    All,
    /// Reports the viewer submitted
    Mine,
    /// Reports the viewer claimed or resolved
    Volunteered,
}

impl ReportTab {
    pub fn matches(&self, report: &Report, viewer_id: &str) -> bool {
        match self {
            ReportTab::All => true,
            ReportTab::Mine => report.is_reported_by(viewer_id),
            ReportTab::Volunteered => report.is_volunteered_by(viewer_id),
        }
    }
}

/// Reports visible under a tab, keeping the input order.
pub fn filter_reports<'a>(
    reports: &'a [Report],
    tab: ReportTab,
    viewer_id: &str,
) -> Vec<&'a Report> {
    reports.iter().filter(|r| tab.matches(r, viewer_id)).collect()
}

/// Status as the viewer sees it: a waiting report they've marked as seen
/// shows as `Seen`.
pub fn display_status(report: &Report, seen: &HashSet<String>) -> DisplayStatus {
    match report.status {
        ReportStatus::Waiting if seen.contains(&report.id) => DisplayStatus::Seen,
        ReportStatus::Waiting => DisplayStatus::Waiting,
        ReportStatus::InProgress => DisplayStatus::InProgress,
        ReportStatus::Resolved => DisplayStatus::Resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_claim_then_resolve() {
        let mut report = Report::new("r1", "alice", at(8));
        transition(&mut report, ReportStatus::InProgress, "bob", at(9)).unwrap();
        assert_eq!(report.volunteer_id.as_deref(), Some("bob"));

        transition(&mut report, ReportStatus::Resolved, "bob", at(10)).unwrap();
        assert!(report.is_resolved());
        assert_eq!(report.updated_at, at(10));
        validate(&report).unwrap();
    }

    #[test]
    fn test_release_clears_volunteer() {
        let mut report = Report::new("r1", "alice", at(8));
        transition(&mut report, ReportStatus::InProgress, "bob", at(9)).unwrap();
        transition(&mut report, ReportStatus::Waiting, "bob", at(10)).unwrap();
        assert_eq!(report.volunteer_id, None);
        validate(&report).unwrap();
    }

    #[test]
    fn test_resolved_cannot_reopen() {
        let mut report = Report::new("r1", "alice", at(8));
        transition(&mut report, ReportStatus::Resolved, "bob", at(9)).unwrap();
        assert!(transition(&mut report, ReportStatus::Waiting, "bob", at(10)).is_err());
        assert!(report.is_resolved());
    }

    #[test]
    fn test_resolved_rescue_cannot_be_taken_over() {
        let mut report = Report::new("r1", "alice", at(8));
        transition(&mut report, ReportStatus::Resolved, "bob", at(9)).unwrap();

        assert!(transition(&mut report, ReportStatus::Resolved, "mallory", at(10)).is_err());
        assert!(transition(&mut report, ReportStatus::Resolved, "bob", at(10)).is_err());
        assert_eq!(report.volunteer_id.as_deref(), Some("bob"));
        assert_eq!(report.updated_at, at(9));
    }

    #[test]
    fn test_claim_cannot_be_taken_over() {
        let mut report = Report::new("r1", "alice", at(8));
        transition(&mut report, ReportStatus::InProgress, "bob", at(9)).unwrap();

        let err = transition(&mut report, ReportStatus::InProgress, "mallory", at(10)).unwrap_err();
        assert!(err.to_string().contains("claimed by bob"), "got {err}");
        assert!(transition(&mut report, ReportStatus::Resolved, "mallory", at(10)).is_err());
        assert!(transition(&mut report, ReportStatus::Waiting, "mallory", at(10)).is_err());
        assert_eq!(report.status, ReportStatus::InProgress);
        assert_eq!(report.volunteer_id.as_deref(), Some("bob"));

        // The holder can still re-claim
        transition(&mut report, ReportStatus::InProgress, "bob", at(11)).unwrap();
        assert_eq!(report.updated_at, at(11));
    }

    #[test]
    fn test_anonymous_update_rejected() {
        let mut report = Report::new("r1", "alice", at(8));
        assert!(transition(&mut report, ReportStatus::InProgress, "", at(9)).is_err());
        assert_eq!(report.status, ReportStatus::Waiting);
    }

    #[test]
    fn test_waiting_with_volunteer_is_invalid() {
        let mut report = Report::new("r1", "alice", at(8));
        report.volunteer_id = Some("bob".to_string());
        let err = validate(&report).unwrap_err();
        assert!(err.to_string().contains("waiting"), "got {err}");
    }

    #[test]
    fn test_batch_rejects_duplicates() {
        let batch = vec![
            Report::new("r1", "alice", at(8)),
            Report::new("r1", "bob", at(9)),
        ];
        assert!(validate_batch(&batch).is_err());
    }

    #[test]
    fn test_seen_overlay_only_affects_waiting() {
        let mut seen = HashSet::new();
        seen.insert("r1".to_string());

        let waiting = Report::new("r1", "alice", at(8));
        assert_eq!(display_status(&waiting, &seen), DisplayStatus::Seen);

        let mut claimed = waiting.clone();
        transition(&mut claimed, ReportStatus::InProgress, "bob", at(9)).unwrap();
        assert_eq!(display_status(&claimed, &seen), DisplayStatus::InProgress);
    }

    #[test]
    fn test_tabs() {
        let mut rescued = Report::new("r2", "carol", at(8));
        transition(&mut rescued, ReportStatus::Resolved, "alice", at(9)).unwrap();
        let reports = vec![Report::new("r1", "alice", at(8)), rescued];

        assert_eq!(filter_reports(&reports, ReportTab::All, "alice").len(), 2);
        assert_eq!(filter_reports(&reports, ReportTab::Mine, "alice")[0].id, "r1");
        assert_eq!(
            filter_reports(&reports, ReportTab::Volunteered, "alice")[0].id,
            "r2"
        );
    }
}
