//! Completion cues.
//!
//! Playback is best effort: the player reports the outcome and the caller
//! logs it. A failed cue never affects the timer.

use serde::{Deserialize, Serialize};

use crate::error::AudioError;
use crate::timer::SessionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// A focus session finished.
    Alarm,
    /// A break finished.
    Chime,
}

impl Cue {
    pub fn for_completed(mode: SessionMode) -> Self {
        match mode {
            SessionMode::Focus => Cue::Alarm,
            SessionMode::Break => Cue::Chime,
        }
    }
}

/// Host audio primitive.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError>;
}

/// Plays nothing. Used when notifications are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl CuePlayer for Silent {
    fn play(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }
}

impl<P: CuePlayer + ?Sized> CuePlayer for Box<P> {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        (**self).play(cue)
    }
}
