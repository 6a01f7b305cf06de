use clap::Subcommand;
use focuscafe_core::{Database, Profile, ProfileField};
use serde::Serialize;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show name, wallet and active cosmetic
    Show,
    /// Set the display name
    Rename {
        /// New display name
        name: String,
    },
}

#[derive(Serialize)]
struct ProfileView<'a> {
    name: &'a str,
    coins: u64,
    theme: &'a str,
    unlocked: &'a [String],
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut profile = Profile::load(&db);

    match action {
        ProfileAction::Show => {
            if profile.needs_name() {
                eprintln!("no display name yet; set one with `focuscafe profile rename <name>`");
            }
            let view = ProfileView {
                name: profile.display_name(),
                coins: profile.coins(),
                theme: profile.theme(),
                unlocked: profile.unlocked(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        ProfileAction::Rename { name } => {
            if !profile.set_display_name(&name) {
                return Err("display name cannot be blank".into());
            }
            profile.persist(&db, ProfileField::User)?;
            println!("hello, {}", profile.display_name());
        }
    }
    Ok(())
}
