//! Statistics module for Focus Cafe
//!
//! Currently the 30-day activity history behind the heatmap and the
//! all-time session count.

mod activity;

pub use activity::{
    current_streak, last_30_days, today_key, total_sessions, ActivityLog, DayActivity,
    WINDOW_DAYS,
};
