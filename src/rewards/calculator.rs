// Rewards calculator: coins, badges and level from a user's report history.
//
// Coins: 10 per submitted report, 25 per report the user resolved as
// volunteer. Level goes up every 50 coins. Badges are cumulative threshold
// checks, so holding "First Report" and "Active Reporter" at once is normal.

use serde::{Deserialize, Serialize};

use crate::db::models::{RedemptionRecord, Report};

pub const COINS_PER_REPORT: u64 = 10;
pub const COINS_PER_RESOLVED_RESCUE: u64 = 25;
pub const COINS_PER_LEVEL: u64 = 50;

/// A named milestone. Variant order is the order badges are awarded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "First Report")]
    FirstReport,
    #[serde(rename = "Active Reporter")]
    ActiveReporter,
    #[serde(rename = "Dedicated Reporter")]
    DedicatedReporter,
    #[serde(rename = "First Rescue")]
    FirstRescue,
    #[serde(rename = "Hero")]
    Hero,
    #[serde(rename = "Legendary Rescuer")]
    LegendaryRescuer,
    #[serde(rename = "Problem Solver")]
    ProblemSolver,
    #[serde(rename = "Animal Guardian")]
    AnimalGuardian,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::FirstReport => "First Report",
            Badge::ActiveReporter => "Active Reporter",
            Badge::DedicatedReporter => "Dedicated Reporter",
            Badge::FirstRescue => "First Rescue",
            Badge::Hero => "Hero",
            Badge::LegendaryRescuer => "Legendary Rescuer",
            Badge::ProblemSolver => "Problem Solver",
            Badge::AnimalGuardian => "Animal Guardian",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which activity count a badge threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Track {
    Submitted,
    Volunteered,
    Resolved,
}

/// Badge thresholds in award priority order.
const BADGE_RULES: [(Badge, Track, u64); 8] = [
    (Badge::FirstReport, Track::Submitted, 1),
    (Badge::ActiveReporter, Track::Submitted, 5),
    (Badge::DedicatedReporter, Track::Submitted, 10),
    (Badge::FirstRescue, Track::Volunteered, 1),
    (Badge::Hero, Track::Volunteered, 5),
    (Badge::LegendaryRescuer, Track::Volunteered, 10),
    (Badge::ProblemSolver, Track::Resolved, 1),
    (Badge::AnimalGuardian, Track::Resolved, 5),
];

/// The three counts everything else is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounts {
    /// Reports the user created
    pub submitted: u64,
    /// Reports the user is the volunteer on, whatever their status
    pub volunteered: u64,
    /// Reports the user is the volunteer on that are resolved
    pub resolved: u64,
}

impl ActivityCounts {
    /// Partition the report list for one user. Order-independent.
    pub fn tally(reports: &[Report], user_id: &str) -> Self {
        reports.iter().fold(Self::default(), |mut counts, report| {
            if report.is_reported_by(user_id) {
                counts.submitted += 1;
            }
            if report.is_volunteered_by(user_id) {
                counts.volunteered += 1;
                if report.is_resolved() {
                    counts.resolved += 1;
                }
            }
            counts
        })
    }

    pub fn earned_coins(&self) -> u64 {
        self.submitted * COINS_PER_REPORT + self.resolved * COINS_PER_RESOLVED_RESCUE
    }

    /// Badges unlocked by these counts, in award priority order.
    pub fn badges(&self) -> Vec<Badge> {
        let mut earned = Vec::new();
        for (badge, track, threshold) in BADGE_RULES {
            let count = match track {
                Track::Submitted => self.submitted,
                Track::Volunteered => self.volunteered,
                Track::Resolved => self.resolved,
            };
            if count >= threshold && !earned.contains(&badge) {
                earned.push(badge);
            }
        }
        earned
    }
}

/// Point-in-time rewards summary for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsSnapshot {
    pub coins: u64,
    pub badges: Vec<Badge>,
    pub level: u32,
    pub rescues: u64,
}

impl Default for RewardsSnapshot {
    fn default() -> Self {
        Self {
            coins: 0,
            badges: Vec::new(),
            level: 1,
            rescues: 0,
        }
    }
}

impl RewardsSnapshot {
    /// Subtract a redemption ledger from the spendable balance.
    ///
    /// Badges and level stay as computed from earned coins; only the balance
    /// moves. The balance never goes below zero.
    pub fn net_of_redemptions(mut self, ledger: &[RedemptionRecord]) -> Self {
        let redeemed: u64 = ledger.iter().map(|r| r.amount).sum();
        self.coins = self.coins.saturating_sub(redeemed);
        self
    }
}

/// Level for a coin total: `max(1, coins / 50 + 1)`.
pub fn level_for_coins(coins: u64) -> u32 {
    let level = coins / COINS_PER_LEVEL + 1;
    u32::try_from(level).unwrap_or(u32::MAX).max(1)
}

/// Compute a user's rewards from the full report list.
///
/// An empty user id or an empty report list yields the zero snapshot.
pub fn calculate_user_rewards(reports: &[Report], user_id: &str) -> RewardsSnapshot {
    if user_id.is_empty() || reports.is_empty() {
        return RewardsSnapshot::default();
    }

    let counts = ActivityCounts::tally(reports, user_id);
    let coins = counts.earned_coins();

    RewardsSnapshot {
        coins,
        badges: counts.badges(),
        level: level_for_coins(coins),
        rescues: counts.volunteered,
    }
}
