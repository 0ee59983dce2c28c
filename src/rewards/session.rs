// Rewards session: the presentation-owned snapshot and its redemption dialog.
//
// The snapshot is replaced wholesale on recompute and mutated in place on
// redemption. One redemption dialog can be open at a time; every opening
// gets a fresh generation number, and a gesture is only honoured while the
// generation it was issued under is still open. A successful redemption
// closes the dialog, so a second click from the same opening can't debit
// again.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::calculator::{calculate_user_rewards, RewardsSnapshot};
use super::catalog::RewardCatalogEntry;
use super::redemption::{debit, RedemptionOutcome};
use crate::db::models::{RedemptionRecord, Report};

/// Permission to attempt exactly one redemption. Not `Clone`: redeeming
/// consumes it.
#[derive(Debug)]
pub struct RedeemGesture {
    generation: u64,
    reward: &'static RewardCatalogEntry,
}

impl RedeemGesture {
    pub fn reward(&self) -> &'static RewardCatalogEntry {
        self.reward
    }
}

#[derive(Debug)]
pub struct RewardsSession {
    user_id: String,
    snapshot: RewardsSnapshot,
    generation: u64,
    dialog_open: bool,
}

impl RewardsSession {
    /// A session for one user, starting from the zero snapshot.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            snapshot: RewardsSnapshot::default(),
            generation: 0,
            dialog_open: false,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn snapshot(&self) -> &RewardsSnapshot {
        &self.snapshot
    }

    /// Discard the current snapshot and derive a new one from the reports,
    /// netting out the user's persisted redemptions.
    ///
    /// Debits applied in this session but never written to the ledger are
    /// lost here.
    pub fn recompute(&mut self, reports: &[Report], ledger: &[RedemptionRecord]) {
        let own: Vec<RedemptionRecord> = ledger
            .iter()
            .filter(|r| r.user_id == self.user_id)
            .cloned()
            .collect();
        self.snapshot = calculate_user_rewards(reports, &self.user_id).net_of_redemptions(&own);
        debug!(
            user = %self.user_id,
            coins = self.snapshot.coins,
            level = self.snapshot.level,
            badges = self.snapshot.badges.len(),
            "Recomputed rewards snapshot"
        );
    }

    /// Switch the active user. The snapshot resets until the next recompute
    /// and any open dialog closes.
    pub fn switch_user(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
        self.snapshot = RewardsSnapshot::default();
        self.close_dialog();
    }

    pub fn open_dialog(&mut self) {
        self.generation += 1;
        self.dialog_open = true;
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    /// Press "Redeem" on a catalog entry. Returns `None` when no dialog is
    /// open or the balance can't cover the cost (the button is disabled).
    pub fn press(&self, reward: &'static RewardCatalogEntry) -> Option<RedeemGesture> {
        if !self.dialog_open || !self.can_afford(reward) {
            return None;
        }
        Some(RedeemGesture {
            generation: self.generation,
            reward,
        })
    }

    pub fn can_afford(&self, reward: &RewardCatalogEntry) -> bool {
        super::redemption::can_redeem(self.snapshot.coins, reward.cost)
    }

    /// Apply a gesture. On success the cost is debited from the snapshot and
    /// the dialog closes; otherwise nothing changes.
    pub fn redeem(&mut self, gesture: RedeemGesture, at: DateTime<Utc>) -> RedemptionOutcome {
        if !self.dialog_open || gesture.generation != self.generation {
            debug!(
                user = %self.user_id,
                reward = gesture.reward.id,
                "Ignoring redemption from a closed dialog"
            );
            return RedemptionOutcome::DialogClosed;
        }

        let cost = gesture.reward.cost;
        let Some(remaining) = debit(self.snapshot.coins, cost) else {
            info!(
                user = %self.user_id,
                reward = gesture.reward.id,
                balance = self.snapshot.coins,
                cost,
                "Redemption rejected: insufficient balance"
            );
            return RedemptionOutcome::InsufficientBalance {
                balance: self.snapshot.coins,
                cost,
            };
        };

        self.snapshot.coins = remaining;
        self.close_dialog();
        info!(
            user = %self.user_id,
            reward = gesture.reward.id,
            cost,
            remaining,
            "Reward redeemed"
        );

        RedemptionOutcome::Redeemed {
            record: RedemptionRecord {
                user_id: self.user_id.clone(),
                reward_id: gesture.reward.id.to_string(),
                amount: cost,
                redeemed_at: at,
            },
            remaining,
        }
    }
}
