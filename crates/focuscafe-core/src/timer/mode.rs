use serde::{Deserialize, Serialize};

pub const DEFAULT_FOCUS_MIN: u32 = 25;
pub const DEFAULT_BREAK_MIN: u32 = 5;
pub const FOCUS_MAX_MIN: u32 = 60;
pub const BREAK_MAX_MIN: u32 = 15;
pub const MIN_DURATION_MIN: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Focus,
    Break,
}

impl SessionMode {
    pub fn label(self) -> &'static str {
        match self {
            SessionMode::Focus => "FOCUS",
            SessionMode::Break => "BREAK",
        }
    }

    /// The mode a completed session of this mode hands over to.
    pub fn next(self) -> Self {
        match self {
            SessionMode::Focus => SessionMode::Break,
            SessionMode::Break => SessionMode::Focus,
        }
    }

    /// Upper bound in minutes accepted for this mode.
    pub fn max_minutes(self) -> u32 {
        match self {
            SessionMode::Focus => FOCUS_MAX_MIN,
            SessionMode::Break => BREAK_MAX_MIN,
        }
    }
}

impl std::str::FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(SessionMode::Focus),
            "break" => Ok(SessionMode::Break),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Configured minutes per mode, always inside the mode's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    focus_min: u32,
    break_min: u32,
}

impl Durations {
    /// Build from raw minutes, clamping each into its bounds.
    pub fn new(focus_min: i64, break_min: i64) -> Self {
        Self {
            focus_min: clamp_minutes(SessionMode::Focus, focus_min),
            break_min: clamp_minutes(SessionMode::Break, break_min),
        }
    }

    pub fn for_mode(&self, mode: SessionMode) -> u32 {
        match mode {
            SessionMode::Focus => self.focus_min,
            SessionMode::Break => self.break_min,
        }
    }

    /// Duration in seconds for `mode`.
    pub fn secs_for(&self, mode: SessionMode) -> u64 {
        u64::from(self.for_mode(mode)) * 60
    }

    /// Store `minutes` for `mode` after clamping; returns the stored value.
    pub fn set(&mut self, mode: SessionMode, minutes: i64) -> u32 {
        let clamped = clamp_minutes(mode, minutes);
        match mode {
            SessionMode::Focus => self.focus_min = clamped,
            SessionMode::Break => self.break_min = clamped,
        }
        clamped
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus_min: DEFAULT_FOCUS_MIN,
            break_min: DEFAULT_BREAK_MIN,
        }
    }
}

/// Clamp minutes into `[1, max]` for the given mode.
pub fn clamp_minutes(mode: SessionMode, minutes: i64) -> u32 {
    minutes.clamp(i64::from(MIN_DURATION_MIN), i64::from(mode.max_minutes())) as u32
}

/// Read the leading integer of free-form duration input.
///
/// Leading whitespace and one sign are allowed, then the run of ASCII digits
/// up to the first other character: `"12.5"` reads as 12 and `"30min"` as
/// 30. Input without a leading digit yields `None`. Values beyond `i64`
/// saturate so they still clamp to the mode's maximum.
pub fn parse_minutes(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let saturated = if negative { i64::MIN } else { i64::MAX };
    let value = rest[..digits].bytes().try_fold(0i64, |acc, d| {
        let digit = i64::from(d - b'0');
        let acc = acc.checked_mul(10)?;
        if negative {
            acc.checked_sub(digit)
        } else {
            acc.checked_add(digit)
        }
    });
    Some(value.unwrap_or(saturated))
}
