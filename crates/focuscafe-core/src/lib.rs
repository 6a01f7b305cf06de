//! # Focus Cafe Core Library
//!
//! Core logic for Focus Cafe, a gamified focus/break session timer. The CLI
//! binary is a thin shell over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a second-granular FOCUS/BREAK state machine driven by an
//!   external 1 Hz tick source that exists only while the clock runs
//! - **Profile**: coins, session counters, 30-day activity, cosmetics and
//!   playlists, persisted one key per field group
//! - **Ledger**: the reward and purchase rules over the cosmetic catalog
//! - **Projection**: a frame mirrored to an always-on-top external display
//! - **App**: the orchestrator routing engine events to their effects
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: the session state machine
//! - [`FocusCafe`]: the orchestrator
//! - [`Database`]: SQLite-backed key-value persistence
//! - [`Config`]: TOML configuration

pub mod app;
pub mod audio;
pub mod error;
pub mod events;
pub mod ledger;
pub mod playlists;
pub mod profile;
pub mod projection;
pub mod stats;
pub mod storage;
pub mod timer;

pub use app::{Command, FocusCafe, Notice};
pub use audio::{Cue, CuePlayer, Silent};
pub use error::{AudioError, ConfigError, CoreError, ProjectionError, StorageError};
pub use events::Event;
pub use ledger::{Cosmetic, PurchaseOutcome};
pub use playlists::Playlist;
pub use profile::{Profile, ProfileField};
pub use projection::{DisplayList, ExternalDisplay, Frame, NoDisplay, Projection, Surface};
pub use storage::{Config, Database, KvStore};
pub use timer::{Durations, SessionEngine, SessionMode, TimerView};
