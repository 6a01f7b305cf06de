use clap::Subcommand;
use focuscafe_core::stats::{current_streak, last_30_days, today_key, total_sessions, DayActivity};
use focuscafe_core::{Database, Profile};
use serde::Serialize;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Session counters, all-time total and current streak
    Show,
    /// 30-day activity heatmap
    Heatmap {
        /// Print the raw window as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear counters and history (coins and cosmetics are kept)
    Reset,
}

/// Heatmap intensity for a day's completed focus sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeatTier {
    None,
    Low,
    Medium,
    High,
}

impl HeatTier {
    fn for_count(count: u32) -> Self {
        match count {
            0 => HeatTier::None,
            1..=2 => HeatTier::Low,
            3..=5 => HeatTier::Medium,
            _ => HeatTier::High,
        }
    }

    fn glyph(self) -> char {
        match self {
            HeatTier::None => '·',
            HeatTier::Low => '░',
            HeatTier::Medium => '▒',
            HeatTier::High => '█',
        }
    }
}

#[derive(Serialize)]
struct Summary {
    focus: u64,
    #[serde(rename = "break")]
    breaks: u64,
    total_sessions: u64,
    streak_days: u32,
    coins: u64,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut profile = Profile::load(&db);
    let today = today_key();

    match action {
        StatsAction::Show => {
            let counters = profile.counters();
            let summary = Summary {
                focus: counters.focus,
                breaks: counters.breaks,
                total_sessions: total_sessions(profile.activity()),
                streak_days: current_streak(profile.activity(), today),
                coins: profile.coins(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Heatmap { json } => {
            let window = last_30_days(profile.activity(), today);
            if json {
                println!("{}", serde_json::to_string_pretty(&window)?);
            } else {
                println!("{}", render_heatmap(&window));
            }
        }
        StatsAction::Reset => {
            for field in profile.reset_stats() {
                profile.persist(&db, field)?;
            }
            println!("stats reset");
        }
    }
    Ok(())
}

/// One glyph per day, oldest first, in rows of ten.
fn render_heatmap(window: &[DayActivity]) -> String {
    window
        .chunks(10)
        .map(|row| row.iter().map(|d| HeatTier::for_count(d.count).glyph()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
