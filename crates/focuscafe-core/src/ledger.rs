//! Coins and cosmetic themes.
//!
//! The only invariant here is that the balance never goes negative; every
//! rule violation is a plain outcome value, never an error.

use serde::Serialize;
use tracing::{debug, info};

use crate::profile::Profile;

/// Coins credited for each completed focus session.
pub const FOCUS_REWARD: u64 = 10;

/// The free cosmetic every profile owns.
pub const DEFAULT_COSMETIC: &str = "mug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cosmetic {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u64,
    pub icon: &'static str,
}

static CATALOG: [Cosmetic; 4] = [
    Cosmetic {
        id: "mug",
        name: "Classic Mug",
        cost: 0,
        icon: "☕",
    },
    Cosmetic {
        id: "candle",
        name: "Midnight Candle",
        cost: 50,
        icon: "🕯️",
    },
    Cosmetic {
        id: "horizon",
        name: "Golden Horizon",
        cost: 150,
        icon: "🌅",
    },
    Cosmetic {
        id: "bonsai",
        name: "Zen Bonsai",
        cost: 300,
        icon: "🌳",
    },
];

/// Shop order.
pub fn catalog() -> &'static [Cosmetic] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static Cosmetic> {
    CATALOG.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    Purchased { cost: u64, balance: u64 },
    AlreadyOwned,
    InsufficientFunds { cost: u64, balance: u64 },
    UnknownCosmetic,
}

impl PurchaseOutcome {
    pub fn is_purchased(&self) -> bool {
        matches!(self, PurchaseOutcome::Purchased { .. })
    }
}

/// Buy `id` if it is affordable and not yet owned.
pub fn purchase(profile: &mut Profile, id: &str) -> PurchaseOutcome {
    let Some(cosmetic) = find(id) else {
        return PurchaseOutcome::UnknownCosmetic;
    };
    if profile.is_unlocked(id) {
        return PurchaseOutcome::AlreadyOwned;
    }
    if !profile.debit(cosmetic.cost) {
        debug!(id, cost = cosmetic.cost, balance = profile.coins(), "cannot afford cosmetic");
        return PurchaseOutcome::InsufficientFunds {
            cost: cosmetic.cost,
            balance: profile.coins(),
        };
    }
    profile.unlock(id);
    info!(id, cost = cosmetic.cost, balance = profile.coins(), "cosmetic purchased");
    PurchaseOutcome::Purchased {
        cost: cosmetic.cost,
        balance: profile.coins(),
    }
}

/// Make `id` the active cosmetic. Locked ids are ignored.
pub fn select(profile: &mut Profile, id: &str) -> bool {
    if !profile.is_unlocked(id) {
        return false;
    }
    profile.set_theme(id);
    true
}

/// True when some locked cosmetic is already affordable.
pub fn shop_badge(profile: &Profile) -> bool {
    CATALOG
        .iter()
        .any(|c| !profile.is_unlocked(c.id) && profile.coins() >= c.cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn catalog_has_exactly_one_free_entry() {
        let free: Vec<_> = catalog().iter().filter(|c| c.cost == 0).collect();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].id, DEFAULT_COSMETIC);
    }

    #[test]
    fn purchase_debits_and_unlocks() {
        let mut profile = Profile::with_coins(200);
        let outcome = purchase(&mut profile, "horizon");
        assert_eq!(
            outcome,
            PurchaseOutcome::Purchased {
                cost: 150,
                balance: 50
            }
        );
        assert!(profile.is_unlocked("horizon"));
        assert_eq!(profile.coins(), 50);
    }

    #[test]
    fn unaffordable_purchase_is_noop() {
        let mut profile = Profile::with_coins(100);
        let before = profile.clone();
        let outcome = purchase(&mut profile, "horizon");
        assert_eq!(
            outcome,
            PurchaseOutcome::InsufficientFunds {
                cost: 150,
                balance: 100
            }
        );
        assert_eq!(profile, before);
    }

    #[test]
    fn repeat_purchase_is_noop() {
        let mut profile = Profile::with_coins(120);
        assert!(purchase(&mut profile, "candle").is_purchased());
        assert_eq!(purchase(&mut profile, "candle"), PurchaseOutcome::AlreadyOwned);
        assert_eq!(profile.coins(), 70);
        assert_eq!(purchase(&mut profile, "mug"), PurchaseOutcome::AlreadyOwned);
    }

    #[test]
    fn unknown_cosmetic_is_noop() {
        let mut profile = Profile::with_coins(1000);
        assert_eq!(purchase(&mut profile, "lava"), PurchaseOutcome::UnknownCosmetic);
        assert_eq!(profile.coins(), 1000);
    }

    #[test]
    fn select_requires_unlock() {
        let mut profile = Profile::with_coins(50);
        assert!(!select(&mut profile, "candle"));
        assert_eq!(profile.theme(), "mug");
        purchase(&mut profile, "candle");
        assert!(select(&mut profile, "candle"));
        assert_eq!(profile.theme(), "candle");
    }

    #[test]
    fn badge_shows_when_something_is_affordable() {
        assert!(!shop_badge(&Profile::with_coins(49)));
        assert!(shop_badge(&Profile::with_coins(50)));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Buy(usize),
        Select(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..5usize).prop_map(Op::Buy),
            (0..5usize).prop_map(Op::Select),
        ]
    }

    proptest! {
        #[test]
        fn balance_and_selection_invariants_hold(
            coins in 0u64..700,
            ops in proptest::collection::vec(op(), 0..40),
        ) {
            let ids = ["mug", "candle", "horizon", "bonsai", "nope"];
            let mut profile = Profile::with_coins(coins);
            let mut spent = 0;
            for op in ops {
                match op {
                    Op::Buy(i) => {
                        if let PurchaseOutcome::Purchased { cost, .. } = purchase(&mut profile, ids[i]) {
                            spent += cost;
                        }
                    }
                    Op::Select(i) => {
                        select(&mut profile, ids[i]);
                    }
                }
                prop_assert!(profile.is_unlocked(profile.theme()));
                prop_assert_eq!(profile.coins() + spent, coins);
            }
        }
    }
}
