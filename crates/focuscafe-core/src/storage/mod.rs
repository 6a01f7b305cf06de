mod config;
pub mod database;

pub use config::{Config, NotificationsConfig, ProjectionConfig, TimerConfig};
pub use database::{Database, KvStore};

use std::path::PathBuf;

/// Returns `~/.config/focuscafe[-dev]/` based on FOCUSCAFE_ENV.
///
/// Set FOCUSCAFE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSCAFE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focuscafe-dev")
    } else {
        base_dir.join("focuscafe")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
