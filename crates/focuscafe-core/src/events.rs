use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionMode;

/// Every state change of the session engine produces an Event.
/// The orchestrator applies the effects; the decorative layer subscribes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        mode: SessionMode,
        minutes: u32,
        /// Whether the idle clock was reset to the new duration.
        clock_reset: bool,
        at: DateTime<Utc>,
    },
    Ticked {
        remaining_secs: u64,
    },
    /// The countdown hit zero while running. The engine has already moved
    /// to `next_mode` with a fresh, idle clock.
    SessionCompleted {
        completed: SessionMode,
        next_mode: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::ModeSwitched { .. } => "mode_switched",
            Event::DurationChanged { .. } => "duration_changed",
            Event::Ticked { .. } => "ticked",
            Event::SessionCompleted { .. } => "session_completed",
        }
    }
}
