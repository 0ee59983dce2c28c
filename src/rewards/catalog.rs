// Reward catalog: the fixed list of things coins can be spent on.
//
// Entries whose id starts with `sponsor` are "sponsor a rescue" tiers; the
// rest are personal rewards. Catalog order is display order.

use serde::Serialize;

/// Identifier prefix that marks a sponsorship tier.
pub const SPONSOR_PREFIX: &str = "sponsor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardCatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u64,
}

impl RewardCatalogEntry {
    pub fn is_sponsorship(&self) -> bool {
        self.id.starts_with(SPONSOR_PREFIX)
    }
}

static CATALOG: [RewardCatalogEntry; 7] = [
    RewardCatalogEntry {
        id: "reward1",
        name: "Premium Pet Food Coupon",
        description: "10% off at local pet stores",
        cost: 100,
    },
    RewardCatalogEntry {
        id: "reward2",
        name: "Veterinary Care Discount",
        description: "15% off at partner vet clinics",
        cost: 250,
    },
    RewardCatalogEntry {
        id: "reward3",
        name: "Custom Pet Tag",
        description: "Free personalized pet tag",
        cost: 50,
    },
    RewardCatalogEntry {
        id: "reward4",
        name: "Donation to Shelters",
        description: "Donate to local animal shelters",
        cost: 75,
    },
    RewardCatalogEntry {
        id: "sponsor1",
        name: "Sponsor Basic Rescue",
        description: "Sponsor rescue (5 rescues)",
        cost: 500,
    },
    RewardCatalogEntry {
        id: "sponsor2",
        name: "Sponsor Standard Rescue",
        description: "Sponsor rescue (20 rescues)",
        cost: 1000,
    },
    RewardCatalogEntry {
        id: "sponsor3",
        name: "Sponsor Premium Rescue",
        description: "Sponsor rescue (50 rescues)",
        cost: 2000,
    },
];

/// Every redeemable reward, in display order.
pub fn available_rewards() -> &'static [RewardCatalogEntry] {
    &CATALOG
}

/// Personal rewards only.
pub fn consumer_rewards() -> impl Iterator<Item = &'static RewardCatalogEntry> {
    CATALOG.iter().filter(|entry| !entry.is_sponsorship())
}

/// "Sponsor a rescue" tiers only, cheapest first as listed.
pub fn sponsorship_tiers() -> impl Iterator<Item = &'static RewardCatalogEntry> {
    CATALOG.iter().filter(|entry| entry.is_sponsorship())
}

pub fn find_reward(id: &str) -> Option<&'static RewardCatalogEntry> {
    CATALOG.iter().find(|entry| entry.id == id)
}

/// Whether a balance is enough to sponsor a rescue at the entry tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SponsorshipEligibility {
    Eligible { tier: &'static RewardCatalogEntry },
    Short { needed: u64, balance: u64 },
}

/// Check a balance against the first listed sponsorship tier.
pub fn sponsorship_eligibility(balance: u64) -> SponsorshipEligibility {
    match sponsorship_tiers().next() {
        Some(tier) if balance >= tier.cost => SponsorshipEligibility::Eligible { tier },
        Some(tier) => SponsorshipEligibility::Short {
            needed: tier.cost,
            balance,
        },
        // No tiers configured: nothing to gate on
        None => SponsorshipEligibility::Short { needed: 0, balance },
    }
}
