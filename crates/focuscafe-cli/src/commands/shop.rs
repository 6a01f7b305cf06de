use clap::Subcommand;
use focuscafe_core::ledger::{self, PurchaseOutcome};
use focuscafe_core::{Database, Profile, ProfileField};

#[derive(Subcommand)]
pub enum ShopAction {
    /// List cosmetics with price and ownership
    List,
    /// Buy a cosmetic
    Buy {
        /// Cosmetic id (e.g. "candle")
        id: String,
    },
    /// Make an owned cosmetic active
    Select {
        /// Cosmetic id
        id: String,
    },
}

pub fn run(action: ShopAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut profile = Profile::load(&db);

    match action {
        ShopAction::List => {
            let badge = if ledger::shop_badge(&profile) { " •" } else { "" };
            println!("Coins: {}{badge}", profile.coins());
            for item in ledger::catalog() {
                let status = if profile.theme() == item.id {
                    "active".to_string()
                } else if profile.is_unlocked(item.id) {
                    "owned".to_string()
                } else {
                    format!("{} coins", item.cost)
                };
                println!("  {} {:<8} {:<16} {status}", item.icon, item.id, item.name);
            }
        }
        ShopAction::Buy { id } => match ledger::purchase(&mut profile, &id) {
            PurchaseOutcome::Purchased { cost, balance } => {
                profile.persist(&db, ProfileField::Coins)?;
                profile.persist(&db, ProfileField::Unlocked)?;
                println!("bought {id} for {cost} coins, {balance} left");
            }
            PurchaseOutcome::AlreadyOwned => println!("{id} is already owned"),
            PurchaseOutcome::InsufficientFunds { cost, balance } => {
                return Err(format!("{id} costs {cost} coins, you have {balance}").into());
            }
            PurchaseOutcome::UnknownCosmetic => {
                return Err(format!("unknown cosmetic: {id}").into());
            }
        },
        ShopAction::Select { id } => {
            if !ledger::select(&mut profile, &id) {
                return Err(format!("{id} is not unlocked").into());
            }
            profile.persist(&db, ProfileField::Theme)?;
            println!("active cosmetic: {id}");
        }
    }
    Ok(())
}
