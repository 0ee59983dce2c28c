// Redemption authorizer: does a balance cover a cost, and what the caller
// sees when it does or doesn't.

use crate::db::models::RedemptionRecord;

/// True iff the balance covers the cost.
pub fn can_redeem(balance: u64, cost: u64) -> bool {
    balance >= cost
}

/// Balance left after an authorized debit, or `None` when the balance
/// doesn't cover the cost. There is no partial debit.
pub fn debit(balance: u64, cost: u64) -> Option<u64> {
    if can_redeem(balance, cost) {
        Some(balance - cost)
    } else {
        None
    }
}

/// Result of one redemption attempt. A rejection is a normal value, not an
/// error: the caller shows a notice and nothing is mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum RedemptionOutcome {
    Redeemed {
        record: RedemptionRecord,
        remaining: u64,
    },
    InsufficientBalance {
        balance: u64,
        cost: u64,
    },
    /// The gesture came from a dialog that has since closed, e.g. a second
    /// click landing after the first one already redeemed.
    DialogClosed,
}

impl RedemptionOutcome {
    pub fn is_redeemed(&self) -> bool {
        matches!(self, RedemptionOutcome::Redeemed { .. })
    }

    /// Inline notice for the user.
    pub fn notice(&self) -> String {
        match self {
            RedemptionOutcome::Redeemed { .. } => "Reward redeemed successfully!".to_string(),
            RedemptionOutcome::InsufficientBalance { balance, cost } => format!(
                "Not enough coins to redeem this reward (need {cost}, have {balance})"
            ),
            RedemptionOutcome::DialogClosed => {
                "This redemption is no longer available. Open the rewards dialog again."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_balance_is_enough() {
        assert!(can_redeem(100, 100));
        assert_eq!(debit(100, 100), Some(0));
    }

    #[test]
    fn test_one_short_is_rejected() {
        assert!(!can_redeem(99, 100));
        assert_eq!(debit(99, 100), None);
    }

    #[test]
    fn test_free_reward_always_redeemable() {
        assert!(can_redeem(0, 0));
    }

    #[test]
    fn test_notice_mentions_shortfall() {
        let outcome = RedemptionOutcome::InsufficientBalance {
            balance: 99,
            cost: 100,
        };
        assert!(!outcome.is_redeemed());
        assert!(outcome.notice().starts_with("Not enough coins"));
    }
}
