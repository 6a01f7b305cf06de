//! Keeps an off-interface surface in lock-step with the timer and, on
//! request, mirrors it to an always-on-top external display.
//!
//! ```text
//! Detached --enter (available, opened)--> Projected
//! Projected --exit | present failure | drop--> Detached
//! ```

use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, warn};

use super::frame::Frame;
use super::surface::Surface;
use crate::error::ProjectionError;
use crate::timer::TimerView;

/// Host primitive for an always-on-top display outside the main interface.
pub trait ExternalDisplay {
    /// Whether the host supports an external display at all.
    fn is_available(&self) -> bool;
    /// Show the display, starting from `first`.
    fn open(&mut self, first: &Frame) -> Result<(), ProjectionError>;
    /// Mirror a freshly painted frame.
    fn present(&mut self, frame: &Frame) -> Result<(), ProjectionError>;
    /// Release the display. Must tolerate being called when not open.
    fn close(&mut self);
}

/// A host without any external display.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisplay;

impl ExternalDisplay for NoDisplay {
    fn is_available(&self) -> bool {
        false
    }

    fn open(&mut self, _first: &Frame) -> Result<(), ProjectionError> {
        Err(ProjectionError::Unavailable)
    }

    fn present(&mut self, _frame: &Frame) -> Result<(), ProjectionError> {
        Err(ProjectionError::Unavailable)
    }

    fn close(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionState {
    Detached,
    Projected,
}

pub struct Projection<S: Surface, D: ExternalDisplay>
where
    S::Error: Display,
{
    surface: S,
    display: D,
    state: ProjectionState,
    frame: Option<Frame>,
    redraws: u64,
}

impl<S: Surface, D: ExternalDisplay> Projection<S, D>
where
    S::Error: Display,
{
    pub fn new(surface: S, display: D) -> Self {
        Self {
            surface,
            display,
            state: ProjectionState::Detached,
            frame: None,
            redraws: 0,
        }
    }

    pub fn state(&self) -> ProjectionState {
        self.state
    }

    pub fn is_projected(&self) -> bool {
        self.state == ProjectionState::Projected
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Last painted frame.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Repaint the surface from `view` and mirror it when projected.
    ///
    /// A display that rejects the frame is released and the renderer
    /// detaches; the error is returned for the caller to report.
    pub fn redraw(&mut self, view: &TimerView) -> Result<(), ProjectionError> {
        self.paint(view);
        if !self.is_projected() {
            return Ok(());
        }
        let Some(frame) = self.frame.as_ref() else {
            return Ok(());
        };
        if let Err(e) = self.display.present(frame) {
            warn!(error = %e, "external display rejected frame, detaching");
            self.release();
            return Err(e);
        }
        Ok(())
    }

    /// Start mirroring to the external display.
    ///
    /// The surface is repainted before the display is requested so it never
    /// opens on a stale or blank frame. On failure the renderer stays
    /// detached.
    pub fn enter(&mut self, view: &TimerView) -> Result<(), ProjectionError> {
        if self.is_projected() {
            return Ok(());
        }
        if !self.display.is_available() {
            return Err(ProjectionError::Unavailable);
        }
        self.paint(view);
        let frame = self.frame.get_or_insert_with(|| Frame::compose(view));
        self.display.open(frame)?;
        self.state = ProjectionState::Projected;
        debug!("projection entered");
        Ok(())
    }

    /// Stop mirroring. Idempotent.
    pub fn exit(&mut self) {
        if self.is_projected() {
            self.release();
            debug!("projection exited");
        }
    }

    pub fn toggle(&mut self, view: &TimerView) -> Result<ProjectionState, ProjectionError> {
        if self.is_projected() {
            self.exit();
        } else {
            self.enter(view)?;
        }
        Ok(self.state)
    }

    fn paint(&mut self, view: &TimerView) {
        let frame = Frame::compose(view);
        if let Err(e) = frame.paint(&mut self.surface) {
            warn!(error = %e, "failed to paint projection surface");
        }
        self.frame = Some(frame);
        self.redraws += 1;
    }

    fn release(&mut self) {
        self.display.close();
        self.state = ProjectionState::Detached;
    }
}

impl<S: Surface, D: ExternalDisplay> Drop for Projection<S, D>
where
    S::Error: Display,
{
    fn drop(&mut self) {
        if self.is_projected() {
            self.release();
        }
    }
}
