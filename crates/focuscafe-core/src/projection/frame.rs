//! The mirrored frame: a pure function of mode, remaining time and
//! whether the clock is running.

use serde::Serialize;

use super::surface::{FontFamily, Rect, Rgb, Surface, TextStyle};
use crate::timer::{SessionMode, TimerView};

pub const FOCUS_BACKGROUND: Rgb = Rgb(0x0c, 0x0a, 0x09);
pub const BREAK_BACKGROUND: Rgb = Rgb(0x06, 0x4e, 0x3b);
pub const COUNTDOWN_COLOR: Rgb = Rgb(0xff, 0xff, 0xff);
pub const FOCUS_LABEL_COLOR: Rgb = Rgb(0xfb, 0xbf, 0x24);
pub const BREAK_LABEL_COLOR: Rgb = Rgb(0x34, 0xd3, 0x99);
pub const PAUSED_LABEL_COLOR: Rgb = Rgb(0x94, 0xa3, 0xb8);

/// Layout is expressed on a 512px reference frame and scaled to the surface.
const REFERENCE_EDGE: u32 = 512;
const COUNTDOWN_PX: u32 = 150;
const LABEL_PX: u32 = 40;
const LABEL_OFFSET_PX: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusLabel {
    Focus,
    Break,
    Paused,
}

impl StatusLabel {
    pub fn text(self) -> &'static str {
        match self {
            StatusLabel::Focus => "FOCUS",
            StatusLabel::Break => "BREAK",
            StatusLabel::Paused => "PAUSED",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            StatusLabel::Focus => FOCUS_LABEL_COLOR,
            StatusLabel::Break => BREAK_LABEL_COLOR,
            StatusLabel::Paused => PAUSED_LABEL_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub background: Rgb,
    pub countdown: String,
    pub status: StatusLabel,
}

impl Frame {
    pub fn compose(view: &TimerView) -> Self {
        let background = match view.mode {
            SessionMode::Focus => FOCUS_BACKGROUND,
            SessionMode::Break => BREAK_BACKGROUND,
        };
        let status = match (view.is_running, view.mode) {
            (false, _) => StatusLabel::Paused,
            (true, SessionMode::Focus) => StatusLabel::Focus,
            (true, SessionMode::Break) => StatusLabel::Break,
        };
        Self {
            background,
            countdown: format_clock(view.time_left_secs),
            status,
        }
    }

    /// Paint onto `surface`: background, centered countdown, status label
    /// below it.
    pub fn paint<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        let size = surface.size();
        let edge = u64::from(size.width.min(size.height));
        let scale = |px: u32| {
            let scaled = u64::from(px) * edge / u64::from(REFERENCE_EDGE);
            u32::try_from(scaled).unwrap_or(u32::MAX)
        };
        let center = (size.width / 2, size.height / 2);

        surface.fill(Rect::covering(size), self.background)?;
        surface.text(
            &self.countdown,
            center,
            TextStyle {
                size_px: scale(COUNTDOWN_PX),
                family: FontFamily::Monospace,
            },
            COUNTDOWN_COLOR,
        )?;
        surface.text(
            self.status.text(),
            (center.0, center.1.saturating_add(scale(LABEL_OFFSET_PX))),
            TextStyle {
                size_px: scale(LABEL_PX),
                family: FontFamily::SansSerif,
            },
            self.status.color(),
        )
    }
}

/// `MM:SS`, both zero-padded.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
