//! Per-day focus activity.
//!
//! The log maps local calendar days to the number of FOCUS sessions
//! completed that day. Display tiers for the heatmap belong to the
//! consumer; this module only answers counts.

use std::collections::BTreeMap;

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Length of the history window shown by the heatmap.
pub const WINDOW_DAYS: u64 = 30;

/// Today's key on the local calendar. Completions and window queries both
/// go through here so they agree on the day boundary.
pub fn today_key() -> NaiveDate {
    Local::now().date_naive()
}

/// Date-keyed log of completed focus sessions.
///
/// Serialized as `{"YYYY-MM-DD": count}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog(BTreeMap<NaiveDate, u32>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub count: u32,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, date: NaiveDate) -> u32 {
        self.0.get(&date).copied().unwrap_or(0)
    }

    /// Add one completed session to `date`, creating the entry if needed.
    pub fn increment(&mut self, date: NaiveDate) -> u32 {
        let entry = self.0.entry(date).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.0.iter().map(|(d, c)| (*d, *c))
    }

    /// Parse a persisted log, dropping entries whose key is not a date or
    /// whose value is not a non-negative integer.
    ///
    /// Returns `None` when the payload is not a JSON object at all.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw).ok()?;
        let mut log = BTreeMap::new();
        for (key, value) in entries {
            let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d");
            let count = value.as_u64().and_then(|c| u32::try_from(c).ok());
            match (date, count) {
                (Ok(date), Some(count)) => {
                    log.insert(date, count);
                }
                _ => warn!(%key, %value, "dropping malformed activity entry"),
            }
        }
        Some(Self(log))
    }
}

impl FromIterator<(NaiveDate, u32)> for ActivityLog {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The fixed window `[today - 29, today]`, oldest first. Missing days are 0.
pub fn last_30_days(log: &ActivityLog, today: NaiveDate) -> Vec<DayActivity> {
    (0..WINDOW_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DayActivity {
            date,
            count: log.count(date),
        })
        .collect()
}

/// Sum over the whole log, not just the 30-day window.
pub fn total_sessions(log: &ActivityLog) -> u64 {
    log.0.values().map(|&c| u64::from(c)).sum()
}

/// Consecutive active days ending today. A day without sessions yet does
/// not break a streak that ran through yesterday.
pub fn current_streak(log: &ActivityLog, today: NaiveDate) -> u32 {
    let mut day = if log.count(today) > 0 {
        Some(today)
    } else {
        today.pred_opt()
    };
    let mut streak = 0;
    while let Some(d) = day {
        if log.count(d) == 0 {
            break;
        }
        streak += 1;
        day = d.pred_opt();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_has_thirty_days_ending_today() {
        let today = date(2024, 3, 10);
        let days = last_30_days(&ActivityLog::new(), today);
        assert_eq!(days.len(), 30);
        assert_eq!(days.first().unwrap().date, date(2024, 2, 10));
        assert_eq!(days.last().unwrap().date, today);
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        assert!(days.iter().all(|d| d.count == 0));
    }

    #[test]
    fn window_reads_sparse_counts() {
        let today = date(2024, 1, 5);
        let mut log = ActivityLog::new();
        log.increment(today);
        log.increment(today);
        log.increment(date(2023, 12, 25));
        log.increment(date(2023, 1, 1));

        let days = last_30_days(&log, today);
        assert_eq!(days.last().unwrap().count, 2);
        let christmas = days.iter().find(|d| d.date == date(2023, 12, 25)).unwrap();
        assert_eq!(christmas.count, 1);
        assert_eq!(days.iter().map(|d| d.count).sum::<u32>(), 3);
    }

    #[test]
    fn total_counts_outside_the_window() {
        let log: ActivityLog = [(date(2020, 1, 1), 4), (date(2024, 6, 1), 2)]
            .into_iter()
            .collect();
        assert_eq!(total_sessions(&log), 6);
    }

    #[test]
    fn serializes_as_iso_keyed_map() {
        let log: ActivityLog = [(date(2024, 2, 29), 3)].into_iter().collect();
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, r#"{"2024-02-29":3}"#);
        let back: ActivityLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn lenient_parse_drops_bad_entries() {
        let log =
            ActivityLog::parse_lenient(r#"{"2024-01-01":2,"yesterday":1,"2024-01-02":-3}"#).unwrap();
        assert_eq!(log.count(date(2024, 1, 1)), 2);
        assert_eq!(total_sessions(&log), 2);
        assert!(ActivityLog::parse_lenient("[1,2]").is_none());
    }

    #[test]
    fn streak_counts_back_from_today_or_yesterday() {
        let today = date(2024, 5, 10);
        let log: ActivityLog = [
            (date(2024, 5, 7), 1),
            (date(2024, 5, 8), 2),
            (date(2024, 5, 9), 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(current_streak(&log, today), 3);

        let mut with_today = log.clone();
        with_today.increment(today);
        assert_eq!(current_streak(&with_today, today), 4);

        assert_eq!(current_streak(&log, date(2024, 5, 12)), 0);
    }
}
