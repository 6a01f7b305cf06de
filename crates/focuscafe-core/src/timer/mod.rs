mod engine;
mod mode;
mod ticker;

pub use engine::{SessionEngine, TimerView};
pub use mode::{
    clamp_minutes, parse_minutes, Durations, SessionMode, BREAK_MAX_MIN, DEFAULT_BREAK_MIN,
    DEFAULT_FOCUS_MIN, FOCUS_MAX_MIN, MIN_DURATION_MIN,
};
pub use ticker::{Ticker, TICK_PERIOD};
