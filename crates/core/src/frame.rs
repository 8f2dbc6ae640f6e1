//! Explicit frame loop driven by the host's frame-scheduling primitive.
//!
//! The loop is either [`LoopState::Running`] or [`LoopState::Stopped`], and
//! only ever moves from the first to the second. It holds at most one
//! pending frame handle, which is what teardown cancels.

use std::fmt::Debug;

use tracing::{trace, warn};

/// Host primitive that delivers a callback on the next animation frame.
pub trait FrameScheduler {
    /// Identifies one requested frame, e.g. a `requestAnimationFrame` id.
    type Handle: Copy + Debug;

    /// Requests one callback. `None` when the host refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Cancels a previously requested callback.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// One mount's worth of animation frames.
#[derive(Debug)]
pub struct FrameLoop<H> {
    state: LoopState,
    pending: Option<H>,
    frames: u64,
}

impl<H: Copy + Debug> FrameLoop<H> {
    /// Starts a running loop and requests its first frame.
    pub fn start<S: FrameScheduler<Handle = H>>(scheduler: &mut S) -> Self {
        let mut frame_loop = Self {
            state: LoopState::Running,
            pending: None,
            frames: 0,
        };
        frame_loop.schedule(scheduler);
        frame_loop
    }

    /// Current loop state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames delivered while running.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Handle of the requested but undelivered frame, if any.
    pub fn pending(&self) -> Option<H> {
        self.pending
    }

    /// Accepts a delivered frame. Returns `false`, and does nothing, once
    /// stopped; the caller must then skip simulating and drawing.
    pub fn begin_frame(&mut self) -> bool {
        self.pending = None;
        if !self.is_running() {
            return false;
        }
        self.frames += 1;
        true
    }

    /// Requests the next frame unless stopped or already pending.
    pub fn schedule<S: FrameScheduler<Handle = H>>(&mut self, scheduler: &mut S) {
        if !self.is_running() || self.pending.is_some() {
            return;
        }
        self.pending = scheduler.request_frame();
        match self.pending {
            Some(handle) => trace!(?handle, "frame requested"),
            None => warn!("host refused an animation frame; loop idles until the next host event"),
        }
    }

    /// Cancels the pending frame, if any, and stops for good.
    pub fn stop<S: FrameScheduler<Handle = H>>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.state = LoopState::Stopped;
    }
}
