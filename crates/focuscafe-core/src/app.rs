//! The orchestrator: owns the engine, the profile and the projection, and
//! routes every engine event to its effects.
//!
//! Effects of one event are applied in a fixed order so nobody observes a
//! half-applied expiry:
//!
//! 1. profile updates (coins, counters, activity) and their persistence
//! 2. the completion cue
//! 3. tick source cancellation when the engine went idle
//! 4. projection redraw
//! 5. external listeners
//!
//! Side-effect failures (storage, audio, display) are logged and queued as
//! [`Notice`]s; none of them can stop the timer.

use std::fmt::{self, Display};
use std::future::Future;

use chrono::{NaiveDate, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::audio::{Cue, CuePlayer};
use crate::error::ProjectionError;
use crate::events::Event;
use crate::ledger::{self, PurchaseOutcome};
use crate::playlists::{self, Playlist};
use crate::profile::{Profile, ProfileField};
use crate::projection::{ExternalDisplay, Projection, ProjectionState, Surface};
use crate::stats::today_key;
use crate::storage::KvStore;
use crate::timer::{Durations, SessionEngine, SessionMode, Ticker, TimerView};

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Audio(String),
    Projection(String),
    Storage { key: &'static str, message: String },
}

impl Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Audio(msg) => write!(f, "completion sound unavailable: {msg}"),
            Notice::Projection(msg) => write!(f, "floating timer unavailable: {msg}"),
            Notice::Storage { key, message } => write!(f, "could not save {key}: {message}"),
        }
    }
}

/// Timer controls accepted by [`FocusCafe::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    SwitchMode(SessionMode),
    SetDuration(SessionMode, i64),
    ToggleProjection,
    Quit,
}

pub type Listener = Box<dyn FnMut(&Event, &TimerView)>;

pub struct FocusCafe<K, S, D, A>
where
    K: KvStore,
    S: Surface,
    S::Error: Display,
    D: ExternalDisplay,
    A: CuePlayer,
{
    engine: SessionEngine,
    profile: Profile,
    projection: Projection<S, D>,
    ticker: Ticker,
    store: K,
    cues: A,
    calendar: fn() -> NaiveDate,
    listeners: Vec<Listener>,
    notices: Vec<Notice>,
}

impl<K, S, D, A> FocusCafe<K, S, D, A>
where
    K: KvStore,
    S: Surface,
    S::Error: Display,
    D: ExternalDisplay,
    A: CuePlayer,
{
    /// Load the profile from `store` and create an idle FOCUS session.
    pub fn new(store: K, durations: Durations, surface: S, display: D, cues: A) -> Self {
        let profile = Profile::load(&store);
        let engine = SessionEngine::new(durations);
        let mut projection = Projection::new(surface, display);
        // Detached redraws cannot fail.
        let _ = projection.redraw(&engine.view());
        Self {
            engine,
            profile,
            projection,
            ticker: Ticker::new(),
            store,
            cues,
            calendar: today_key,
            listeners: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Override the calendar used to key completed sessions.
    pub fn with_calendar(mut self, calendar: fn() -> NaiveDate) -> Self {
        self.calendar = calendar;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn view(&self) -> TimerView {
        self.engine.view()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn projection(&self) -> &Projection<S, D> {
        &self.projection
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Register a listener called after every engine event is applied.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    // ── Timer controls ───────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start();
        self.dispatch(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause();
        self.dispatch(event)
    }

    pub fn toggle(&mut self) -> Option<Event> {
        let event = self.engine.toggle();
        self.dispatch(event)
    }

    pub fn reset(&mut self) -> Option<Event> {
        let event = self.engine.reset();
        self.dispatch(event)
    }

    pub fn switch_mode(&mut self, mode: SessionMode) -> Option<Event> {
        let event = self.engine.switch_mode(mode);
        self.dispatch(event)
    }

    pub fn set_duration(&mut self, mode: SessionMode, minutes: i64) -> Option<Event> {
        let event = self.engine.set_duration(mode, minutes);
        self.dispatch(event)
    }

    pub fn set_duration_input(&mut self, mode: SessionMode, input: &str) -> Option<Event> {
        let event = self.engine.set_duration_input(mode, input);
        self.dispatch(event)
    }

    /// One elapsed second from the tick source.
    pub fn on_tick(&mut self) -> Option<Event> {
        let event = self.engine.tick();
        self.dispatch(event)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => {
                self.start();
            }
            Command::Pause => {
                self.pause();
            }
            Command::Toggle => {
                self.toggle();
            }
            Command::Reset => {
                self.reset();
            }
            Command::SwitchMode(mode) => {
                self.switch_mode(mode);
            }
            Command::SetDuration(mode, minutes) => {
                self.set_duration(mode, minutes);
            }
            Command::ToggleProjection => {
                let _ = self.toggle_projection();
            }
            Command::Quit => {}
        }
    }

    /// Drive the timer until `shutdown` resolves or `Command::Quit` arrives.
    ///
    /// Once every command sender is dropped the loop stops reading commands
    /// but keeps counting down; it then ends as soon as the engine is idle.
    ///
    /// The 1 Hz tick source is registered whenever the engine is running and
    /// dropped as soon as it is not.
    pub async fn run<F>(&mut self, commands: &mut mpsc::UnboundedReceiver<Command>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut commands_open = true;
        loop {
            if self.engine.is_running() {
                self.ticker.arm();
            } else if !commands_open {
                break;
            }
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.ticker.tick() => {
                    self.on_tick();
                }
                command = commands.recv(), if commands_open => match command {
                    Some(Command::Quit) => break,
                    Some(command) => self.apply(command),
                    None => {
                        debug!("command stream closed");
                        commands_open = false;
                    }
                },
            }
        }
        self.shutdown();
    }

    /// Stop ticking and release the external display.
    pub fn shutdown(&mut self) {
        self.ticker.disarm();
        self.projection.exit();
    }

    // ── Projection ───────────────────────────────────────────────────

    pub fn enter_projection(&mut self) -> Result<(), ProjectionError> {
        let view = self.engine.view();
        self.projection.enter(&view).inspect_err(|e| {
            warn!(error = %e, "could not open floating timer");
            self.notices.push(Notice::Projection(e.to_string()));
        })
    }

    pub fn exit_projection(&mut self) {
        self.projection.exit();
    }

    pub fn toggle_projection(&mut self) -> Result<ProjectionState, ProjectionError> {
        if self.projection.is_projected() {
            self.exit_projection();
        } else {
            self.enter_projection()?;
        }
        Ok(self.projection.state())
    }

    // ── Profile ──────────────────────────────────────────────────────

    pub fn purchase(&mut self, id: &str) -> PurchaseOutcome {
        let outcome = ledger::purchase(&mut self.profile, id);
        if outcome.is_purchased() {
            self.persist(&[ProfileField::Coins, ProfileField::Unlocked]);
        }
        outcome
    }

    pub fn select(&mut self, id: &str) -> bool {
        let selected = ledger::select(&mut self.profile, id);
        if selected {
            self.persist(&[ProfileField::Theme]);
        }
        selected
    }

    pub fn set_display_name(&mut self, name: &str) -> bool {
        let changed = self.profile.set_display_name(name);
        if changed {
            self.persist(&[ProfileField::User]);
        }
        changed
    }

    pub fn save_playlist(&mut self, name: &str, link: &str) -> Option<Playlist> {
        let id = playlists::next_id(&self.profile, Utc::now().timestamp_millis());
        let saved = playlists::save(&mut self.profile, name, link, id);
        if saved.is_some() {
            self.persist(&[ProfileField::Playlists]);
        }
        saved
    }

    pub fn remove_playlist(&mut self, id: i64) -> bool {
        let removed = playlists::remove(&mut self.profile, id);
        if removed {
            self.persist(&[ProfileField::Playlists]);
        }
        removed
    }

    pub fn clear_playlists(&mut self) -> usize {
        let removed = playlists::clear(&mut self.profile);
        self.persist(&[ProfileField::Playlists]);
        removed
    }

    pub fn reset_stats(&mut self) {
        let fields = self.profile.reset_stats();
        self.persist(&fields);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn dispatch(&mut self, event: Option<Event>) -> Option<Event> {
        let event = event?;
        debug!(kind = event.kind(), "dispatching");

        if let Event::SessionCompleted { completed, .. } = event {
            let fields = self.profile.record_completion(completed, (self.calendar)());
            self.persist(&fields);
            self.play_cue(Cue::for_completed(completed));
        }

        if !self.engine.is_running() {
            self.ticker.disarm();
        }

        let view = self.engine.view();
        if let Err(e) = self.projection.redraw(&view) {
            self.notices.push(Notice::Projection(e.to_string()));
        }

        for listener in &mut self.listeners {
            listener(&event, &view);
        }
        Some(event)
    }

    fn persist(&mut self, fields: &[ProfileField]) {
        for &field in fields {
            if let Err(e) = self.profile.persist(&self.store, field) {
                warn!(key = field.key(), error = %e, "failed to persist profile field");
                self.notices.push(Notice::Storage {
                    key: field.key(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        if let Err(e) = self.cues.play(cue) {
            warn!(?cue, error = %e, "completion cue failed");
            self.notices.push(Notice::Audio(e.to_string()));
        }
    }
}
