// "Rescue Powered By" attribution for resolved reports.
//
// There is no real sponsor linkage yet, so a display sponsor is picked from
// a fixed pool by base-36 arithmetic on the first two characters of the
// report id. Same id, same sponsor, every render.

use crate::db::models::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SponsorTier {
    Basic,
    Standard,
    Premium,
}

impl SponsorTier {
    const ALL: [SponsorTier; 3] = [SponsorTier::Basic, SponsorTier::Standard, SponsorTier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            SponsorTier::Basic => "basic",
            SponsorTier::Standard => "standard",
            SponsorTier::Premium => "premium",
        }
    }

    /// Display names in this tier's pool.
    pub fn sponsors(&self) -> &'static [&'static str] {
        match self {
            SponsorTier::Basic => &["PetCare Plus", "Animal Friends"],
            SponsorTier::Standard => &["VetMed Services", "PawsForward"],
            SponsorTier::Premium => &["PetLuxe Brands", "AnimalRescue Inc"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SponsorAttribution {
    pub tier: SponsorTier,
    pub name: &'static str,
}

/// Base-36 value of the nth character. Missing or non-alphanumeric
/// characters count as 0.
fn base36_at(id: &str, n: usize) -> usize {
    id.chars()
        .nth(n)
        .and_then(|c| c.to_digit(36))
        .map_or(0, |d| d as usize)
}

/// Pick the display sponsor for a report id.
pub fn sponsor_for_report(report_id: &str) -> SponsorAttribution {
    let tier = SponsorTier::ALL[base36_at(report_id, 0) % SponsorTier::ALL.len()];
    let pool = tier.sponsors();
    SponsorAttribution {
        tier,
        name: pool[base36_at(report_id, 1) % pool.len()],
    }
}

/// What the "Rescue Powered By" column shows to a given viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoweredBy {
    /// The viewer rescued this animal themselves
    SelfRescue,
    Sponsor(SponsorAttribution),
}

/// `None` until the report is resolved.
pub fn rescue_powered_by(report: &Report, viewer_id: Option<&str>) -> Option<PoweredBy> {
    if !report.is_resolved() {
        return None;
    }
    match viewer_id {
        Some(viewer) if report.is_volunteered_by(viewer) => Some(PoweredBy::SelfRescue),
        _ => Some(PoweredBy::Sponsor(sponsor_for_report(&report.id))),
    }
}
