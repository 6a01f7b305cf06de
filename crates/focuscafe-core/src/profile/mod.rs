//! Durable user profile.
//!
//! The profile is split into field groups, each persisted under its own
//! key as JSON. Loading validates every key on its own: anything missing or
//! unreadable falls back to that field's default without touching the rest.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::ledger::{self, DEFAULT_COSMETIC, FOCUS_REWARD};
use crate::playlists::Playlist;
use crate::stats::ActivityLog;
use crate::storage::KvStore;
use crate::timer::SessionMode;

/// Completed session counters, persisted as `{"focus": n, "break": n}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    pub focus: u64,
    #[serde(rename = "break")]
    pub breaks: u64,
}

/// One persistence channel per field group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Coins,
    Stats,
    Activity,
    Unlocked,
    Theme,
    Playlists,
    User,
}

impl ProfileField {
    pub const ALL: [ProfileField; 7] = [
        ProfileField::Coins,
        ProfileField::Stats,
        ProfileField::Activity,
        ProfileField::Unlocked,
        ProfileField::Theme,
        ProfileField::Playlists,
        ProfileField::User,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Coins => "coins",
            ProfileField::Stats => "stats",
            ProfileField::Activity => "activity",
            ProfileField::Unlocked => "unlocked",
            ProfileField::Theme => "theme",
            ProfileField::Playlists => "custom-playlists",
            ProfileField::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    display_name: String,
    coins: u64,
    counters: SessionCounters,
    activity: ActivityLog,
    unlocked: Vec<String>,
    theme: String,
    playlists: Vec<Playlist>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            coins: 0,
            counters: SessionCounters::default(),
            activity: ActivityLog::new(),
            unlocked: vec![DEFAULT_COSMETIC.to_string()],
            theme: DEFAULT_COSMETIC.to_string(),
            playlists: Vec::new(),
        }
    }
}

impl Profile {
    // ── Queries ──────────────────────────────────────────────────────

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// First-run name capture is still pending.
    pub fn needs_name(&self) -> bool {
        self.display_name.is_empty()
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn unlocked(&self) -> &[String] {
        &self.unlocked
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|u| u == id)
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Apply the durable effects of a completed session.
    ///
    /// Returns the field groups that changed.
    pub fn record_completion(&mut self, mode: SessionMode, today: NaiveDate) -> Vec<ProfileField> {
        match mode {
            SessionMode::Focus => {
                self.coins = self.coins.saturating_add(FOCUS_REWARD);
                self.counters.focus += 1;
                let count = self.activity.increment(today);
                info!(coins = self.coins, today = %today, count, "focus session completed");
                vec![ProfileField::Coins, ProfileField::Stats, ProfileField::Activity]
            }
            SessionMode::Break => {
                self.counters.breaks += 1;
                info!(breaks = self.counters.breaks, "break completed");
                vec![ProfileField::Stats]
            }
        }
    }

    /// Set the display name. Blank names are rejected.
    pub fn set_display_name(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.display_name = trimmed.to_string();
        true
    }

    /// Clear counters and history. Coins and cosmetics are kept.
    pub fn reset_stats(&mut self) -> Vec<ProfileField> {
        self.counters = SessionCounters::default();
        self.activity.clear();
        vec![ProfileField::Stats, ProfileField::Activity]
    }

    pub(crate) fn debit(&mut self, amount: u64) -> bool {
        match self.coins.checked_sub(amount) {
            Some(rest) => {
                self.coins = rest;
                true
            }
            None => false,
        }
    }

    pub(crate) fn unlock(&mut self, id: &str) {
        if !self.is_unlocked(id) {
            self.unlocked.push(id.to_string());
        }
    }

    pub(crate) fn set_theme(&mut self, id: &str) {
        self.theme = id.to_string();
    }

    pub(crate) fn playlists_mut(&mut self) -> &mut Vec<Playlist> {
        &mut self.playlists
    }

    #[cfg(test)]
    pub(crate) fn with_coins(coins: u64) -> Self {
        Self {
            coins,
            ..Self::default()
        }
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Load every field group from `store`, defaulting each one that is
    /// missing or malformed.
    pub fn load<K: KvStore + ?Sized>(store: &K) -> Self {
        let defaults = Self::default();
        let mut profile = Self {
            display_name: read_text(store, ProfileField::User).unwrap_or(defaults.display_name),
            coins: read_json(store, ProfileField::Coins).unwrap_or(defaults.coins),
            counters: read_json(store, ProfileField::Stats).unwrap_or(defaults.counters),
            activity: read_raw(store, ProfileField::Activity)
                .and_then(|raw| ActivityLog::parse_lenient(&raw))
                .unwrap_or(defaults.activity),
            unlocked: read_json(store, ProfileField::Unlocked).unwrap_or(defaults.unlocked),
            theme: read_text(store, ProfileField::Theme).unwrap_or(defaults.theme),
            playlists: read_json(store, ProfileField::Playlists).unwrap_or(defaults.playlists),
        };
        profile.repair();
        profile
    }

    /// Enforce the cosmetic invariants on loaded data.
    fn repair(&mut self) {
        self.unlocked.retain(|id| {
            let known = ledger::find(id).is_some();
            if !known {
                warn!(%id, "dropping unknown cosmetic from unlocked set");
            }
            known
        });
        let mut seen = Vec::with_capacity(self.unlocked.len());
        self.unlocked.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
        if !self.is_unlocked(DEFAULT_COSMETIC) {
            self.unlocked.insert(0, DEFAULT_COSMETIC.to_string());
        }
        if !self.is_unlocked(&self.theme) {
            warn!(theme = %self.theme, "selected cosmetic is locked, reverting to default");
            self.theme = DEFAULT_COSMETIC.to_string();
        }
    }

    /// Write one field group to `store`.
    pub fn persist<K: KvStore + ?Sized>(&self, store: &K, field: ProfileField) -> Result<()> {
        let value = match field {
            ProfileField::Coins => serde_json::to_string(&self.coins)?,
            ProfileField::Stats => serde_json::to_string(&self.counters)?,
            ProfileField::Activity => serde_json::to_string(&self.activity)?,
            ProfileField::Unlocked => serde_json::to_string(&self.unlocked)?,
            ProfileField::Theme => serde_json::to_string(&self.theme)?,
            ProfileField::Playlists => serde_json::to_string(&self.playlists)?,
            ProfileField::User => serde_json::to_string(&self.display_name)?,
        };
        store.set(field.key(), &value)?;
        Ok(())
    }

    /// Write every field group, stopping at the first failure.
    pub fn persist_all<K: KvStore + ?Sized>(&self, store: &K) -> Result<()> {
        ProfileField::ALL
            .iter()
            .try_for_each(|&field| self.persist(store, field))
    }
}

fn read_raw<K: KvStore + ?Sized>(store: &K, field: ProfileField) -> Option<String> {
    match store.get(field.key()) {
        Ok(value) => value,
        Err(e) => {
            warn!(key = field.key(), error = %e, "failed to read profile field");
            None
        }
    }
}

fn read_json<T: DeserializeOwned, K: KvStore + ?Sized>(store: &K, field: ProfileField) -> Option<T> {
    let raw = read_raw(store, field)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = field.key(), error = %e, "malformed profile field, using default");
            None
        }
    }
}

/// String fields also accept a bare, unquoted value.
fn read_text<K: KvStore + ?Sized>(store: &K, field: ProfileField) -> Option<String> {
    let raw = read_raw(store, field)?;
    Some(serde_json::from_str::<String>(&raw).unwrap_or(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }

    #[test]
    fn fresh_profile_defaults() {
        let db = Database::open_in_memory().unwrap();
        let profile = Profile::load(&db);
        assert_eq!(profile, Profile::default());
        assert!(profile.needs_name());
        assert_eq!(profile.unlocked(), ["mug".to_string()]);
        assert_eq!(profile.theme(), "mug");
    }

    #[test]
    fn focus_completion_effects() {
        let mut profile = Profile::default();
        let touched = profile.record_completion(SessionMode::Focus, day());
        assert_eq!(profile.coins(), 10);
        assert_eq!(profile.counters().focus, 1);
        assert_eq!(profile.activity().count(day()), 1);
        assert_eq!(
            touched,
            vec![ProfileField::Coins, ProfileField::Stats, ProfileField::Activity]
        );
    }

    #[test]
    fn break_completion_only_counts() {
        let mut profile = Profile::default();
        let touched = profile.record_completion(SessionMode::Break, day());
        assert_eq!(profile.coins(), 0);
        assert_eq!(profile.counters().breaks, 1);
        assert!(profile.activity().is_empty());
        assert_eq!(touched, vec![ProfileField::Stats]);
    }

    #[test]
    fn persisted_fields_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = Profile::default();
        profile.set_display_name("  Ana ");
        profile.record_completion(SessionMode::Focus, day());
        profile.record_completion(SessionMode::Break, day());
        profile.persist_all(&db).unwrap();

        assert_eq!(db.get("coins").unwrap().as_deref(), Some("10"));
        assert_eq!(
            db.get("stats").unwrap().as_deref(),
            Some(r#"{"focus":1,"break":1}"#)
        );
        assert_eq!(
            db.get("activity").unwrap().as_deref(),
            Some(r#"{"2024-04-02":1}"#)
        );

        let loaded = Profile::load(&db);
        assert_eq!(loaded, profile);
        assert_eq!(loaded.display_name(), "Ana");
    }

    #[test]
    fn malformed_keys_fall_back_independently() {
        let db = Database::open_in_memory().unwrap();
        db.set("coins", "not a number").unwrap();
        db.set("stats", r#"{"focus":3,"break":2}"#).unwrap();
        db.set("unlocked", "{").unwrap();
        db.set("user", "Bruno").unwrap();

        let profile = Profile::load(&db);
        assert_eq!(profile.coins(), 0);
        assert_eq!(profile.counters().focus, 3);
        assert_eq!(profile.unlocked(), ["mug".to_string()]);
        assert_eq!(profile.display_name(), "Bruno");
    }

    #[test]
    fn load_repairs_cosmetic_invariants() {
        let db = Database::open_in_memory().unwrap();
        db.set("unlocked", r#"["candle","ghost","candle"]"#).unwrap();
        db.set("theme", r#""horizon""#).unwrap();

        let profile = Profile::load(&db);
        assert_eq!(profile.unlocked(), ["mug".to_string(), "candle".to_string()]);
        assert_eq!(profile.theme(), "mug");
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut profile = Profile::default();
        assert!(!profile.set_display_name("   "));
        assert!(profile.needs_name());
    }

    #[test]
    fn reset_stats_keeps_coins() {
        let mut profile = Profile::default();
        profile.record_completion(SessionMode::Focus, day());
        profile.reset_stats();
        assert_eq!(profile.coins(), 10);
        assert_eq!(profile.counters(), SessionCounters::default());
        assert!(profile.activity().is_empty());
    }
}
