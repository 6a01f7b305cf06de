//! End-to-end session flows through the orchestrator.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use chrono::NaiveDate;
use focuscafe_core::audio::{Cue, CuePlayer};
use focuscafe_core::events::Event;
use focuscafe_core::ledger::PurchaseOutcome;
use focuscafe_core::projection::{DisplayList, ExternalDisplay, Frame, SurfaceSize};
use focuscafe_core::stats::{current_streak, last_30_days};
use focuscafe_core::{
    AudioError, Command, Database, Durations, FocusCafe, KvStore, Notice, ProjectionError,
    SessionMode, StorageError,
};
use tokio::sync::mpsc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

#[derive(Default)]
struct DisplayLog {
    open: bool,
    presented: Vec<String>,
    refuse_present: bool,
}

#[derive(Clone, Default)]
struct SharedDisplay(Rc<RefCell<DisplayLog>>);

impl ExternalDisplay for SharedDisplay {
    fn is_available(&self) -> bool {
        true
    }

    fn open(&mut self, first: &Frame) -> Result<(), ProjectionError> {
        let mut log = self.0.borrow_mut();
        log.open = true;
        log.presented.push(first.countdown.clone());
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<(), ProjectionError> {
        let mut log = self.0.borrow_mut();
        if log.refuse_present {
            return Err(ProjectionError::Refused("window closed".into()));
        }
        log.presented.push(frame.countdown.clone());
        Ok(())
    }

    fn close(&mut self) {
        self.0.borrow_mut().open = false;
    }
}

#[derive(Clone, Default)]
struct RecordingCues {
    played: Rc<RefCell<Vec<Cue>>>,
    blocked: bool,
}

impl CuePlayer for RecordingCues {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        if self.blocked {
            return Err(AudioError::Blocked("autoplay".into()));
        }
        self.played.borrow_mut().push(cue);
        Ok(())
    }
}

/// In-memory store whose writes can be made to fail.
#[derive(Clone, Default)]
struct FlakyStore {
    data: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<RefCell<bool>>,
}

impl KvStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.fail_writes.borrow() {
            return Err(StorageError::QueryFailed("disk full".into()));
        }
        self.data.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

type Cafe<K> = FocusCafe<K, DisplayList, SharedDisplay, RecordingCues>;

fn cafe_with<K: KvStore>(store: K, display: SharedDisplay, cues: RecordingCues) -> Cafe<K> {
    FocusCafe::new(
        store,
        Durations::default(),
        DisplayList::new(SurfaceSize::square(512)),
        display,
        cues,
    )
    .with_calendar(today)
}

fn run_ticks<K: KvStore>(cafe: &mut Cafe<K>, n: u32) -> Vec<Event> {
    (0..n).filter_map(|_| cafe.on_tick()).collect()
}

#[test]
fn full_focus_then_break_cycle() {
    let cues = RecordingCues::default();
    let mut cafe = cafe_with(
        Database::open_in_memory().unwrap(),
        SharedDisplay::default(),
        cues.clone(),
    );

    cafe.start();
    let events = run_ticks(&mut cafe, 1500);
    assert!(matches!(
        events.last(),
        Some(Event::SessionCompleted {
            completed: SessionMode::Focus,
            next_mode: SessionMode::Break,
            remaining_secs: 300,
            ..
        })
    ));
    assert_eq!(cafe.profile().coins(), 10);
    assert_eq!(cafe.profile().counters().focus, 1);
    assert_eq!(cafe.profile().activity().count(today()), 1);

    // BREAK does not start on its own.
    assert!(run_ticks(&mut cafe, 10).is_empty());
    assert_eq!(cafe.view().time_left_secs, 300);

    cafe.start();
    run_ticks(&mut cafe, 300);
    assert_eq!(cafe.view().mode, SessionMode::Focus);
    assert_eq!(cafe.view().time_left_secs, 1500);
    assert_eq!(cafe.profile().coins(), 10);
    assert_eq!(cafe.profile().counters().breaks, 1);
    assert_eq!(*cues.played.borrow(), vec![Cue::Alarm, Cue::Chime]);
}

#[test]
fn paused_session_earns_nothing() {
    let mut cafe = cafe_with(
        Database::open_in_memory().unwrap(),
        SharedDisplay::default(),
        RecordingCues::default(),
    );
    cafe.start();
    run_ticks(&mut cafe, 1000);
    cafe.pause();
    assert!(run_ticks(&mut cafe, 1000).is_empty());
    assert_eq!(cafe.view().time_left_secs, 500);
    cafe.reset();
    assert_eq!(cafe.view().time_left_secs, 1500);
    assert_eq!(cafe.profile().coins(), 0);
}

#[test]
fn listener_sees_coins_already_credited() {
    let store = FlakyStore::default();
    let mut cafe = cafe_with(store.clone(), SharedDisplay::default(), RecordingCues::default());
    let observed = Rc::new(RefCell::new(None));
    let sink = observed.clone();
    let reader = store.clone();
    cafe.subscribe(Box::new(move |event, _view| {
        if matches!(event, Event::SessionCompleted { .. }) {
            *sink.borrow_mut() = reader.get("coins").unwrap();
        }
    }));
    cafe.set_duration(SessionMode::Focus, 1);
    cafe.start();
    run_ticks(&mut cafe, 60);
    assert_eq!(observed.borrow().as_deref(), Some("10"));
}

#[test]
fn projection_mirrors_every_tick_and_detaches_on_failure() {
    let display = SharedDisplay::default();
    let mut cafe = cafe_with(
        Database::open_in_memory().unwrap(),
        display.clone(),
        RecordingCues::default(),
    );
    cafe.start();
    cafe.enter_projection().unwrap();
    run_ticks(&mut cafe, 2);
    assert_eq!(display.0.borrow().presented, vec!["25:00", "24:59", "24:58"]);

    display.0.borrow_mut().refuse_present = true;
    cafe.on_tick();
    assert!(!cafe.projection().is_projected());
    assert!(!display.0.borrow().open);
    assert!(matches!(cafe.take_notices().as_slice(), [Notice::Projection(_)]));

    // The timer never notices.
    assert!(cafe.view().is_running);
    assert_eq!(cafe.view().time_left_secs, 1497);
}

#[test]
fn side_effect_failures_do_not_stop_the_timer() {
    let store = FlakyStore::default();
    let cues = RecordingCues {
        blocked: true,
        ..RecordingCues::default()
    };
    let mut cafe = cafe_with(store.clone(), SharedDisplay::default(), cues);
    cafe.set_duration(SessionMode::Focus, 1);
    *store.fail_writes.borrow_mut() = true;

    cafe.start();
    run_ticks(&mut cafe, 60);

    assert_eq!(cafe.view().mode, SessionMode::Break);
    assert_eq!(cafe.profile().coins(), 10);
    let notices = cafe.take_notices();
    assert!(notices
        .iter()
        .any(|n| matches!(n, Notice::Storage { key: "coins", .. })));
    assert!(notices.iter().any(|n| matches!(n, Notice::Audio(_))));
    assert!(store.data.borrow().get("coins").is_none());
}

#[test]
fn profile_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focuscafe.db");
    {
        let mut cafe = cafe_with(
            Database::open_at(&path).unwrap(),
            SharedDisplay::default(),
            RecordingCues::default(),
        );
        cafe.set_display_name("  Ada ");
        cafe.set_duration(SessionMode::Focus, 1);
        for _ in 0..5 {
            cafe.switch_mode(SessionMode::Focus);
            cafe.start();
            run_ticks(&mut cafe, 60);
        }
        assert_eq!(cafe.purchase("candle"), PurchaseOutcome::Purchased { cost: 50, balance: 0 });
        assert!(cafe.select("candle"));
        cafe.save_playlist("Rain", "https://open.spotify.com/playlist/abc?si=1");
    }

    let cafe = cafe_with(
        Database::open_at(&path).unwrap(),
        SharedDisplay::default(),
        RecordingCues::default(),
    );
    let profile = cafe.profile();
    assert_eq!(profile.display_name(), "Ada");
    assert_eq!(profile.coins(), 0);
    assert_eq!(profile.counters().focus, 5);
    assert_eq!(profile.theme(), "candle");
    assert!(profile.is_unlocked("mug"));
    assert_eq!(
        profile.playlists()[0].url,
        "https://open.spotify.com/embed/playlist/abc"
    );
    assert_eq!(current_streak(profile.activity(), today()), 1);
    let window = last_30_days(profile.activity(), today());
    assert_eq!(window.last().map(|d| d.count), Some(5));
}

#[test]
fn reset_stats_keeps_wallet() {
    let store = FlakyStore::default();
    let mut cafe = cafe_with(store.clone(), SharedDisplay::default(), RecordingCues::default());
    cafe.set_duration(SessionMode::Focus, 1);
    cafe.start();
    run_ticks(&mut cafe, 60);

    cafe.reset_stats();
    assert_eq!(cafe.profile().counters().focus, 0);
    assert!(cafe.profile().activity().is_empty());
    assert_eq!(cafe.profile().coins(), 10);
    assert_eq!(store.get("activity").unwrap().as_deref(), Some("{}"));
}

#[tokio::test(start_paused = true)]
async fn run_loop_drives_a_full_focus_session() {
    let mut cafe = cafe_with(
        Database::open_in_memory().unwrap(),
        SharedDisplay::default(),
        RecordingCues::default(),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(Command::Start).unwrap();

    cafe.run(&mut rx, tokio::time::sleep(Duration::from_secs(1501)))
        .await;

    assert_eq!(cafe.view().mode, SessionMode::Break);
    assert!(!cafe.view().is_running);
    assert_eq!(cafe.view().time_left_secs, 300);
    assert_eq!(cafe.profile().coins(), 10);
}
