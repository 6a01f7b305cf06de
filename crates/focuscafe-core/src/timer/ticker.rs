//! 1 Hz tick source.
//!
//! The interval only exists while the engine is running: it is armed on
//! start and dropped on pause, reset, mode switch and expiry, so no stale
//! callback keeps firing after a logical pause.

use std::time::Duration;

use tokio::time::{self, Instant, Interval};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Register the recurring tick. The first tick fires one period from now.
    /// Re-arming an armed ticker keeps the existing phase.
    pub fn arm(&mut self) {
        if self.interval.is_none() {
            self.interval = Some(time::interval_at(Instant::now() + self.period, self.period));
        }
    }

    pub fn disarm(&mut self) {
        self.interval = None;
    }

    /// Resolve on the next tick. Pending forever while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}
