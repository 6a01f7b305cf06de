mod frame;
mod renderer;
mod surface;

pub use frame::{
    format_clock, Frame, StatusLabel, BREAK_BACKGROUND, BREAK_LABEL_COLOR, COUNTDOWN_COLOR,
    FOCUS_BACKGROUND, FOCUS_LABEL_COLOR, PAUSED_LABEL_COLOR,
};
pub use renderer::{ExternalDisplay, NoDisplay, Projection, ProjectionState};
pub use surface::{
    DisplayList, DrawOp, FontFamily, Rect, Rgb, Surface, SurfaceSize, TextStyle,
};
