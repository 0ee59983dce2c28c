// Rewards engine: coin accrual, badges, levels, the reward catalog and
// redemption. Everything here is synchronous and free of I/O; callers fetch
// report records first and hand them in.

pub mod calculator;
pub mod catalog;
pub mod redemption;
pub mod session;
pub mod sponsor;

pub use calculator::{calculate_user_rewards, Badge, RewardsSnapshot};
pub use catalog::{available_rewards, RewardCatalogEntry};
pub use redemption::{can_redeem, RedemptionOutcome};
pub use session::{RedeemGesture, RewardsSession};
