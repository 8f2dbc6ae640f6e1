//! The `Effect` trait driven by the frame loop and the listener bridge.
//!
//! The trait is object-safe so a host can hold a `Box<dyn Effect>` when it
//! switches between backgrounds at runtime.

use glam::DVec2;
use serde_json::Value;

use crate::surface::Surface;

/// A decorative, frame-driven animation.
///
/// The bridge calls `resize` and `pointer_moved` from host events and
/// `step` followed by `render` once per animation frame. None of these
/// can fail: a broken frame is dropped, not reported.
pub trait Effect {
    /// Rebuilds the effect for a logical surface size in CSS pixels.
    fn resize(&mut self, width: f64, height: f64);

    /// Pointer position relative to the surface origin.
    fn pointer_moved(&mut self, position: DVec2);

    /// Advances simulated time by one frame.
    fn step(&mut self);

    /// Clears `surface` and draws the current state.
    fn render(&self, surface: &mut dyn Surface);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing the parameters: type, default, range, description.
    fn param_schema(&self) -> Value;

    /// Number of simulated elements, for diagnostics.
    fn population(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;
    use serde_json::json;

    /// Counts calls so trait-object dispatch can be checked.
    #[derive(Default)]
    struct Ticker {
        steps: usize,
        size: (f64, f64),
    }

    impl Effect for Ticker {
        fn resize(&mut self, width: f64, height: f64) {
            self.size = (width, height);
        }

        fn pointer_moved(&mut self, _position: DVec2) {}

        fn step(&mut self) {
            self.steps += 1;
        }

        fn render(&self, surface: &mut dyn Surface) {
            surface.clear();
        }

        fn params(&self) -> Value {
            json!({"steps": self.steps})
        }

        fn param_schema(&self) -> Value {
            json!({"steps": {"type": "integer"}})
        }
    }

    #[test]
    fn effect_is_object_safe() {
        let mut effect: Box<dyn Effect> = Box::new(Ticker::default());
        effect.resize(10.0, 20.0);
        effect.step();
        effect.step();
        assert_eq!(effect.params()["steps"], 2);
        assert_eq!(effect.population(), 0);
    }

    #[test]
    fn render_through_dyn_surface() {
        let effect = Ticker::default();
        let mut list = DrawList::default();
        effect.render(&mut list);
        assert_eq!(list.commands().len(), 1);
    }
}
