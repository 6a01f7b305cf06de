use chrono::Utc;
use clap::Subcommand;
use focuscafe_core::playlists;
use focuscafe_core::{Database, Profile, ProfileField};

#[derive(Subcommand)]
pub enum PlaylistAction {
    /// List built-in and saved playlists
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a playlist link (Spotify links are converted to embeds)
    Add {
        /// Display name
        name: String,
        /// Playlist link
        link: String,
    },
    /// Remove a saved playlist
    Remove {
        /// Playlist id as shown by `list`
        id: i64,
    },
    /// Remove every saved playlist
    Clear,
}

pub fn run(action: PlaylistAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut profile = Profile::load(&db);

    match action {
        PlaylistAction::List { json } => {
            let entries = playlists::all(&profile);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    let marker = if entry.custom { "*" } else { " " };
                    println!("{marker} {:<14} {:<18} {}", entry.id, entry.name, entry.url);
                }
            }
        }
        PlaylistAction::Add { name, link } => {
            let id = playlists::next_id(&profile, Utc::now().timestamp_millis());
            let saved = playlists::save(&mut profile, &name, &link, id)
                .ok_or("playlist name and link are required")?;
            profile.persist(&db, ProfileField::Playlists)?;
            println!("saved {} ({})", saved.name, saved.id);
        }
        PlaylistAction::Remove { id } => {
            if !playlists::remove(&mut profile, id) {
                return Err(format!("no saved playlist with id {id}").into());
            }
            profile.persist(&db, ProfileField::Playlists)?;
            println!("removed {id}");
        }
        PlaylistAction::Clear => {
            let removed = playlists::clear(&mut profile);
            profile.persist(&db, ProfileField::Playlists)?;
            println!("removed {removed} playlists");
        }
    }
    Ok(())
}
