#![deny(unsafe_code)]
//! Browser bindings for the node-field renderer.
//!
//! [`NodeFieldBackground`] mounts the field on an `HtmlCanvasElement`:
//! frames come from `requestAnimationFrame`, resize and pointer events from
//! `window` listeners, and drawing goes through the canvas 2D context with
//! its transform scaled by the device pixel ratio.
//!
//! The mounted state lives in an `Rc<RefCell<_>>`; every JS callback holds
//! only a `Weak` to it, so dropping the handle frees everything once
//! [`NodeFieldBackground::unmount`] has detached the callbacks.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};

use glam::DVec2;
use node_field_core::{
    FieldConfig, FrameScheduler, Host, HostEvent, ListenerKind, LoopState, Mount, NodeField, Rgba,
    Surface, SurfaceSize,
};
use tracing::trace;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, Window};

type Shared = Rc<RefCell<Mount<BrowserHost, NodeField>>>;

/// Drops a failed canvas call; drawing errors never reach the page.
fn quiet(result: Result<(), JsValue>) {
    if let Err(e) = result {
        trace!(error = ?e, "canvas call failed");
    }
}

/// [`Surface`] over a `CanvasRenderingContext2d`.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    size: DVec2,
}

impl CanvasSurface {
    fn disc(&self, center: DVec2, radius: f64) {
        self.ctx.begin_path();
        quiet(self.ctx.arc(center.x, center.y, radius, 0.0, TAU));
        self.ctx.fill();
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.size.x, self.size.y);
    }

    fn line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }

    fn radial_glow(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if !(radius > 0.0) {
            return;
        }
        let gradient = match self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
        {
            Ok(gradient) => gradient,
            Err(e) => {
                trace!(error = ?e, "radial gradient rejected");
                return;
            }
        };
        quiet(gradient.add_color_stop(0.0, &color.to_css()));
        quiet(gradient.add_color_stop(1.0, &color.color.with_alpha(0.0).to_css()));
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.disc(center, radius);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if !(radius > 0.0) {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.disc(center, radius);
    }
}

/// The browser side of a [`Mount`]: window, canvas and JS callbacks.
pub struct BrowserHost {
    window: Window,
    canvas: HtmlCanvasElement,
    surface: Option<CanvasSurface>,
    on_frame: Option<Closure<dyn FnMut(f64)>>,
    on_resize: Option<Closure<dyn FnMut(Event)>>,
    on_pointer: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl BrowserHost {
    fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let surface = canvas
            .get_context("2d")?
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .map(|ctx| CanvasSurface {
                ctx,
                size: DVec2::ZERO,
            });
        Ok(Self {
            window,
            canvas,
            surface,
            on_frame: None,
            on_resize: None,
            on_pointer: None,
        })
    }

    /// Creates the JS callbacks. They reach the mount through `shared` and
    /// do nothing once it is gone or busy.
    fn install(&mut self, shared: Weak<RefCell<Mount<BrowserHost, NodeField>>>) {
        let with_mount = move |f: &dyn Fn(&mut Mount<BrowserHost, NodeField>)| {
            if let Some(mount) = shared.upgrade() {
                if let Ok(mut mount) = mount.try_borrow_mut() {
                    f(&mut mount);
                }
            }
        };
        let with_mount = Rc::new(with_mount);

        let frame = Rc::clone(&with_mount);
        self.on_frame = Some(Closure::new(move |_timestamp: f64| {
            frame(&|m| m.frame());
        }));

        let resize = Rc::clone(&with_mount);
        self.on_resize = Some(Closure::new(move |_event: Event| {
            resize(&|m| m.handle(HostEvent::Resize));
        }));

        let canvas = self.canvas.clone();
        self.on_pointer = Some(Closure::new(move |event: MouseEvent| {
            let rect = canvas.get_bounding_client_rect();
            let position = DVec2::new(
                event.client_x() as f64 - rect.left(),
                event.client_y() as f64 - rect.top(),
            );
            with_mount(&|m| m.handle(HostEvent::PointerMove(position)));
        }));
    }

    fn listener(&self, kind: ListenerKind) -> Option<&js_sys::Function> {
        match kind {
            ListenerKind::Resize => self.on_resize.as_ref().map(|c| c.as_ref().unchecked_ref()),
            ListenerKind::PointerMove => self.on_pointer.as_ref().map(|c| c.as_ref().unchecked_ref()),
        }
    }
}

impl FrameScheduler for BrowserHost {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let callback = self.on_frame.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        quiet(self.window.cancel_animation_frame(handle));
    }
}

impl Host for BrowserHost {
    type Surface = CanvasSurface;

    fn surface_size(&self) -> Option<SurfaceSize> {
        if self.surface.is_none() || !self.canvas.is_connected() {
            return None;
        }
        let rect = self.canvas.get_bounding_client_rect();
        Some(SurfaceSize::new(
            rect.width(),
            rect.height(),
            self.window.device_pixel_ratio(),
        ))
    }

    fn apply_size(&mut self, size: SurfaceSize) {
        let (width, height) = size.backing();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        if let Some(surface) = self.surface.as_mut() {
            let scale = size.scale();
            surface.size = DVec2::new(size.width, size.height);
            quiet(surface.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0));
        }
    }

    fn surface(&mut self) -> Option<&mut CanvasSurface> {
        self.surface.as_mut()
    }

    fn attach_listener(&mut self, kind: ListenerKind) -> bool {
        let Some(callback) = self.listener(kind) else {
            return false;
        };
        self.window
            .add_event_listener_with_callback(kind.event_name(), callback)
            .is_ok()
    }

    fn detach_listener(&mut self, kind: ListenerKind) {
        if let Some(callback) = self.listener(kind) {
            quiet(
                self.window
                    .remove_event_listener_with_callback(kind.event_name(), callback),
            );
        }
    }
}

/// Animated node-field background bound to one canvas.
#[wasm_bindgen]
pub struct NodeFieldBackground {
    shared: Shared,
}

#[wasm_bindgen]
impl NodeFieldBackground {
    /// Binds to `canvas`. `params` is an optional JSON object of parameter
    /// overrides; invalid params are rejected here rather than at mount.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        params: Option<String>,
    ) -> Result<NodeFieldBackground, JsValue> {
        let params: serde_json::Value = match params.as_deref() {
            Some(text) => {
                serde_json::from_str(text).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => serde_json::Value::Null,
        };
        let config =
            FieldConfig::from_json(&params).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = (js_sys::Math::random() * (1u64 << 53) as f64) as u64;
        let host = BrowserHost::new(canvas)?;
        let shared: Shared = Rc::new(RefCell::new(Mount::new(host, NodeField::new(config, seed))));
        shared.borrow_mut().host_mut().install(Rc::downgrade(&shared));
        Ok(Self { shared })
    }

    /// Attaches listeners, sizes the field and starts the frame loop.
    pub fn mount(&self) {
        self.shared.borrow_mut().mount();
    }

    /// Cancels the pending frame and detaches both listeners.
    pub fn unmount(&self) {
        self.shared.borrow_mut().unmount();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.shared.borrow().loop_state() == LoopState::Running
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.shared.borrow().effect().nodes().len()
    }

    /// Current parameters as a JSON string.
    pub fn params(&self) -> String {
        self.shared.borrow().effect().config().to_json().to_string()
    }

    /// Parameter schema as a JSON string.
    #[wasm_bindgen(js_name = paramSchema)]
    pub fn param_schema() -> String {
        FieldConfig::param_schema().to_string()
    }
}

impl Drop for NodeFieldBackground {
    fn drop(&mut self) {
        if let Ok(mut mount) = self.shared.try_borrow_mut() {
            mount.unmount();
        }
    }
}
