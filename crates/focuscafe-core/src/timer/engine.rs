//! Session timer engine.
//!
//! A two-mode (FOCUS/BREAK) countdown driven by discrete one-second ticks.
//! It has no internal thread and no knowledge of audio, persistence or
//! rendering: the caller invokes `tick()` once per elapsed second while the
//! engine is running, and every command hands back the `Event` describing
//! what changed.
//!
//! ## State Transitions
//!
//! ```text
//! Focus/Idle <-> Focus/Running --expire--> Break/Idle
//! Break/Idle <-> Break/Running --expire--> Focus/Idle
//! ```
//!
//! Sessions never auto-chain: expiry always lands in the idle sub-state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::mode::{parse_minutes, Durations, SessionMode};
use crate::events::Event;

/// Read-only snapshot of the three values the projection depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    pub mode: SessionMode,
    pub time_left_secs: u64,
    pub is_running: bool,
}

/// Core session engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEngine {
    mode: SessionMode,
    time_left_secs: u64,
    is_running: bool,
    durations: Durations,
}

impl SessionEngine {
    /// Create an idle engine in FOCUS with a full clock.
    pub fn new(durations: Durations) -> Self {
        Self {
            mode: SessionMode::Focus,
            time_left_secs: durations.secs_for(SessionMode::Focus),
            is_running: false,
            durations,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    /// Full length of the current mode in seconds.
    pub fn total_secs(&self) -> u64 {
        self.durations.secs_for(self.mode)
    }

    /// 1.0 on a fresh clock, 0.0 at expiry.
    pub fn remaining_fraction(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        self.time_left_secs as f64 / total as f64
    }

    pub fn elapsed_fraction(&self) -> f64 {
        1.0 - self.remaining_fraction()
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            mode: self.mode,
            time_left_secs: self.time_left_secs,
            is_running: self.is_running,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. A clock at zero must be reset or switched first.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running || self.time_left_secs == 0 {
            return None;
        }
        self.is_running = true;
        debug!(mode = ?self.mode, remaining = self.time_left_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        debug!(mode = ?self.mode, remaining = self.time_left_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.is_running = false;
        self.time_left_secs = self.total_secs();
        Some(Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Switch to `mode` with a full, idle clock. There is no cross-mode resume.
    pub fn switch_mode(&mut self, mode: SessionMode) -> Option<Event> {
        self.is_running = false;
        self.mode = mode;
        self.time_left_secs = self.total_secs();
        debug!(?mode, "mode switched");
        Some(Event::ModeSwitched {
            mode,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Store a new duration for `mode`, clamped to its bounds.
    ///
    /// The idle clock of the active mode follows immediately; an in-flight
    /// countdown keeps its remaining time.
    pub fn set_duration(&mut self, mode: SessionMode, minutes: i64) -> Option<Event> {
        let stored = self.durations.set(mode, minutes);
        let clock_reset = mode == self.mode && !self.is_running;
        if clock_reset {
            self.time_left_secs = self.total_secs();
        }
        Some(Event::DurationChanged {
            mode,
            minutes: stored,
            clock_reset,
            at: Utc::now(),
        })
    }

    /// Like `set_duration` but from raw user input, read up to its leading
    /// integer (`"12.5"` is 12). Input without one is ignored and leaves the
    /// engine untouched.
    pub fn set_duration_input(&mut self, mode: SessionMode, input: &str) -> Option<Event> {
        match parse_minutes(input) {
            Some(minutes) => self.set_duration(mode, minutes),
            None => {
                debug!(input, "ignoring non-numeric duration");
                None
            }
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Event::SessionCompleted` on the tick that reaches zero,
    /// `Event::Ticked` otherwise, and `None` when idle.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running || self.time_left_secs == 0 {
            return None;
        }
        self.time_left_secs -= 1;
        if self.time_left_secs == 0 {
            return Some(self.on_expire());
        }
        Some(Event::Ticked {
            remaining_secs: self.time_left_secs,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_expire(&mut self) -> Event {
        let completed = self.mode;
        self.is_running = false;
        self.mode = completed.next();
        self.time_left_secs = self.total_secs();
        debug!(?completed, next = ?self.mode, "session expired");
        Event::SessionCompleted {
            completed,
            next_mode: self.mode,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        }
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}
