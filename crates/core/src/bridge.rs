//! Listener bridge: wires host events and frames to an [`Effect`].
//!
//! A [`Mount`] owns one host, one effect and (while mounted) one
//! [`FrameLoop`]. `mount` attaches the resize and pointer listeners, sizes
//! the field and starts the loop; `unmount` cancels the pending frame and
//! detaches both listeners. Nothing here returns an error: a missing surface
//! turns every call into a no-op until the surface appears.

use glam::DVec2;
use tracing::{debug, info, warn};

use crate::effect::Effect;
use crate::frame::{FrameLoop, FrameScheduler, LoopState};
use crate::surface::Surface;

/// Size of the drawing surface as laid out by the host page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Logical width in CSS pixels.
    pub width: f64,
    /// Logical height in CSS pixels.
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Device pixel ratio, falling back to 1 for unusable values.
    pub fn scale(&self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    /// Backing store size in device pixels, truncated like a canvas
    /// `width`/`height` assignment.
    pub fn backing(&self) -> (u32, u32) {
        let scale = self.scale();
        let device = |css: f64| {
            if css.is_finite() && css > 0.0 {
                (css * scale).floor().min(u32::MAX as f64) as u32
            } else {
                0
            }
        };
        (device(self.width), device(self.height))
    }
}

/// The two host events the bridge listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    PointerMove,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 2] = [ListenerKind::Resize, ListenerKind::PointerMove];

    /// DOM event name.
    pub fn event_name(self) -> &'static str {
        match self {
            ListenerKind::Resize => "resize",
            ListenerKind::PointerMove => "mousemove",
        }
    }
}

/// An event delivered by a host listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize,
    /// Pointer position relative to the surface origin.
    PointerMove(DVec2),
}

/// Environment a [`Mount`] runs in: frame scheduling, event listeners and
/// the drawing surface.
pub trait Host: FrameScheduler {
    type Surface: Surface;

    /// Current surface size, or `None` while the surface is not attached.
    fn surface_size(&self) -> Option<SurfaceSize>;

    /// Resizes the backing store and scales the drawing transform so the
    /// effect can keep drawing in CSS pixels.
    fn apply_size(&mut self, size: SurfaceSize);

    /// The drawing surface, or `None` while it is not attached.
    fn surface(&mut self) -> Option<&mut Self::Surface>;

    /// Registers the listener for `kind`. Returns `false` if the host refused.
    fn attach_listener(&mut self, kind: ListenerKind) -> bool;

    fn detach_listener(&mut self, kind: ListenerKind);
}

/// A mounted effect.
pub struct Mount<H: Host, E: Effect> {
    host: H,
    effect: E,
    frames: Option<FrameLoop<H::Handle>>,
    attached: Vec<ListenerKind>,
    sized: bool,
}

impl<H: Host, E: Effect> Mount<H, E> {
    /// Pairs a host with an effect. Nothing runs until [`Mount::mount`].
    pub fn new(host: H, effect: E) -> Self {
        Self {
            host,
            effect,
            frames: None,
            attached: Vec::new(),
            sized: false,
        }
    }

    /// The host this effect is mounted on.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, e.g. to install callbacks.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The mounted effect.
    pub fn effect(&self) -> &E {
        &self.effect
    }

    /// Mutable access to the mounted effect.
    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    /// Whether [`Mount::mount`] ran without a matching unmount.
    pub fn is_mounted(&self) -> bool {
        self.frames.is_some()
    }

    /// State of the current loop; `Stopped` when never mounted.
    pub fn loop_state(&self) -> LoopState {
        self.frames
            .as_ref()
            .map_or(LoopState::Stopped, FrameLoop::state)
    }

    /// Listeners currently registered with the host.
    pub fn attached_listeners(&self) -> &[ListenerKind] {
        &self.attached
    }

    /// Attaches listeners, sizes the effect and starts a fresh loop.
    /// Mounting twice is a no-op.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }
        for kind in ListenerKind::ALL {
            if self.host.attach_listener(kind) {
                self.attached.push(kind);
            } else {
                warn!(event = kind.event_name(), "host refused listener");
            }
        }
        self.resize();
        self.frames = Some(FrameLoop::start(&mut self.host));
        info!(population = self.effect.population(), "node field mounted");
    }

    /// Re-reads the surface size and rebuilds the effect for it.
    pub fn resize(&mut self) {
        let Some(size) = self.host.surface_size() else {
            debug!("surface unavailable; deferring initialization");
            return;
        };
        self.host.apply_size(size);
        self.effect.resize(size.width, size.height);
        self.sized = true;
    }

    /// Forwards a pointer position to the effect.
    pub fn pointer_moved(&mut self, position: DVec2) {
        self.effect.pointer_moved(position);
    }

    /// Routes a host event, then re-requests a frame if the host refused
    /// the last one.
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resize => self.resize(),
            HostEvent::PointerMove(position) => self.pointer_moved(position),
        }
        if let Some(frames) = self.frames.as_mut() {
            frames.schedule(&mut self.host);
        }
    }

    /// One animation frame: simulate, render, reschedule.
    ///
    /// A frame delivered after unmount is dropped without rescheduling.
    pub fn frame(&mut self) {
        let running = self
            .frames
            .as_mut()
            .is_some_and(|frames| frames.begin_frame());
        if !running {
            return;
        }
        if !self.sized {
            self.resize();
        }
        if let Some(surface) = self.host.surface() {
            self.effect.step();
            self.effect.render(surface);
        }
        if let Some(frames) = self.frames.as_mut() {
            frames.schedule(&mut self.host);
        }
    }

    /// Cancels the pending frame and detaches every listener.
    pub fn unmount(&mut self) {
        let Some(mut frames) = self.frames.take() else {
            return;
        };
        frames.stop(&mut self.host);
        for kind in self.attached.drain(..) {
            self.host.detach_listener(kind);
        }
        self.sized = false;
        info!(frames = frames.frames(), "node field unmounted");
    }
}
