//! Frame bracketing of drawing commands.
//!
//! Every drawing command of a surface runs inside a frame of its drawing
//! context. In [`RedrawMode::Immediate`] each command opens and closes its own
//! frame (and window surfaces present it). In [`RedrawMode::Manual`] the
//! program opens a frame with `redraw(Manual)` and the commands are batched
//! until `redraw(Immediate)`.

use std::ops::{Deref, DerefMut};

use crate::surface::Canvas;

/// Redraw mode of a surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RedrawMode {
    /// Each drawing command is its own frame, presented right away
    #[default]
    Immediate,
    /// Drawing commands are batched in a frame opened by the program
    Manual,
}

impl RedrawMode {
    /// Mode of the legacy `redraw` argument: 0 is manual, anything else immediate
    pub fn from_legacy(code: i32) -> Self {
        if code == 0 {
            RedrawMode::Manual
        } else {
            RedrawMode::Immediate
        }
    }
}

/// Frame state of a surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrameState {
    #[default]
    Idle,
    FrameOpen,
}

/// Whether a drawing command must open (and then close) its own frame
pub const fn should_auto_manage(mode: RedrawMode, state: FrameState) -> bool {
    matches!((mode, state), (RedrawMode::Immediate, FrameState::Idle))
}

/// Scoped suspension of an open frame.
///
/// Closes the frame of the canvas if one is open, and reopens it when dropped.
/// Operations that need a flushed target (pixel readback, saving, swap chain
/// recreation) run under this guard.
#[derive(Debug)]
pub(crate) struct Suspend<'a> {
    canvas: &'a mut Canvas,
    resume: bool,
}

impl<'a> Suspend<'a> {
    pub(crate) fn new(canvas: &'a mut Canvas) -> Self {
        let resume = canvas.frame_state() == FrameState::FrameOpen;
        if resume {
            // a lost device is flagged by the canvas
            let _ = canvas.end_frame();
        }
        Suspend { canvas, resume }
    }
}

impl Deref for Suspend<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for Suspend<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for Suspend<'_> {
    fn drop(&mut self) {
        if self.resume {
            self.canvas.begin_frame();
        }
    }
}
