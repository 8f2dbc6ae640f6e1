//! Per-frame simulation: drift, toroidal wrap and pointer repulsion.

use glam::DVec2;

use crate::config::FieldConfig;
use crate::field::NodeField;

/// Teleports `value` to the opposite side once it leaves
/// `[-margin, extent + margin]`.
pub fn wrap_axis(value: f64, extent: f64, margin: f64) -> f64 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

/// Displacement pushing a node at `position` away from `pointer`.
///
/// Zero outside the repulsion radius and when the node sits exactly on the
/// pointer (there is no direction to push in).
pub fn repulsion(position: DVec2, pointer: DVec2, config: &FieldConfig) -> DVec2 {
    let offset = position - pointer;
    let d = offset.length();
    if d > 0.0 && d < config.repulsion_radius {
        let magnitude =
            (config.repulsion_radius - d) / config.repulsion_radius * config.repulsion_strength;
        offset / d * magnitude
    } else {
        DVec2::ZERO
    }
}

impl NodeField {
    /// Advances simulated time by one frame and moves every node.
    ///
    /// Repulsion is added to the position only; it leaves no trace in the
    /// velocity once the pointer moves away.
    pub fn advance(&mut self) {
        self.time += self.config.time_step;
        let margin = self.config.wrap_margin;
        let size = self.size;
        for node in &mut self.nodes {
            let moved = node.position + node.velocity;
            node.position = DVec2::new(
                wrap_axis(moved.x, size.x, margin),
                wrap_axis(moved.y, size.y, margin),
            );
            if let Some(pointer) = self.pointer {
                node.position += repulsion(node.position, pointer, &self.config);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Layer, Node};

    fn field_with(nodes: Vec<Node>) -> NodeField {
        let mut field = NodeField::new(FieldConfig::default(), 1);
        field.reset(1000.0, 800.0);
        field.nodes = nodes;
        field
    }

    fn node_at(x: f64, y: f64, vx: f64, vy: f64) -> Node {
        Node {
            position: DVec2::new(x, y),
            velocity: DVec2::new(vx, vy),
            radius: 2.0,
            pulse_phase: 0.0,
            layer: Layer::Mid,
        }
    }

    #[test]
    fn step_advances_time() {
        let mut field = field_with(Vec::new());
        field.advance();
        field.advance();
        assert!((field.time() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn crossing_left_margin_teleports_right() {
        let mut field = field_with(vec![node_at(-21.0, 100.0, 0.1, 0.0)]);
        field.advance();
        assert_eq!(field.nodes()[0].position.x, 1020.0);
        assert!((field.nodes()[0].position.y - 100.0).abs() < 1e-12);
    }

    #[test]
    fn wraps_on_every_edge() {
        let mut field = field_with(vec![
            node_at(1020.5, 10.0, 0.1, 0.0),
            node_at(10.0, -20.1, 0.0, -0.05),
            node_at(10.0, 820.0, 0.0, 0.2),
        ]);
        field.advance();
        assert_eq!(field.nodes()[0].position.x, -20.0);
        assert_eq!(field.nodes()[1].position.y, 820.0);
        assert_eq!(field.nodes()[2].position.y, -20.0);
    }

    #[test]
    fn inside_margin_is_not_wrapped() {
        assert_eq!(wrap_axis(-20.0, 100.0, 20.0), -20.0);
        assert_eq!(wrap_axis(120.0, 100.0, 20.0), 120.0);
        assert_eq!(wrap_axis(50.0, 100.0, 20.0), 50.0);
    }

    #[test]
    fn no_pointer_means_pure_drift() {
        let mut field = NodeField::new(FieldConfig::default(), 5);
        field.reset(1000.0, 800.0);
        // Keep every node well inside so wrap cannot interfere.
        for node in field.nodes_mut() {
            node.position = node.position.clamp(DVec2::splat(5.0), DVec2::new(995.0, 795.0));
        }
        let before: Vec<Node> = field.nodes().to_vec();
        field.advance();
        for (old, new) in before.iter().zip(field.nodes()) {
            assert_eq!(new.position, old.position + old.velocity);
            assert_eq!(new.velocity, old.velocity);
        }
    }

    #[test]
    fn far_pointer_is_inert() {
        let mut field = field_with(vec![node_at(100.0, 100.0, 0.1, 0.1)]);
        field.set_pointer(DVec2::new(400.0, 400.0));
        field.advance();
        let moved = field.nodes()[0].position - DVec2::new(100.0, 100.0);
        assert!((moved - DVec2::new(0.1, 0.1)).length() < 1e-12, "moved {moved:?}");
    }

    #[test]
    fn repulsion_at_distance_ten() {
        let config = FieldConfig::default();
        let push = repulsion(DVec2::new(110.0, 100.0), DVec2::new(100.0, 100.0), &config);
        assert!((push.length() - 0.28).abs() < 1e-12, "magnitude {}", push.length());
        assert!(push.x > 0.0 && push.y.abs() < 1e-12, "direction {push:?}");
    }

    #[test]
    fn repulsion_on_top_of_pointer_is_zero() {
        let config = FieldConfig::default();
        let push = repulsion(DVec2::splat(50.0), DVec2::splat(50.0), &config);
        assert_eq!(push, DVec2::ZERO);

        let mut field = field_with(vec![node_at(50.0, 50.0, 0.0, 0.0)]);
        field.set_pointer(DVec2::splat(50.0));
        field.advance();
        assert!(field.nodes()[0].position.is_finite());
        assert_eq!(field.nodes()[0].position, DVec2::splat(50.0));
    }

    #[test]
    fn repulsion_does_not_touch_velocity() {
        let mut field = field_with(vec![node_at(200.0, 200.0, 0.05, 0.0)]);
        field.set_pointer(DVec2::new(190.0, 200.0));
        field.advance();
        let node = &field.nodes()[0];
        assert_eq!(node.velocity, DVec2::new(0.05, 0.0));
        // drift 0.05 then a push computed at distance 10.05
        let expected = 200.05 + (150.0 - 10.05) / 150.0 * 0.3;
        assert!((node.position.x - expected).abs() < 1e-9);
    }

    #[test]
    fn repulsion_boundary_is_exclusive() {
        let config = FieldConfig::default();
        let push = repulsion(DVec2::new(150.0, 0.0), DVec2::ZERO, &config);
        assert_eq!(push, DVec2::ZERO);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn positions_stay_in_overscan_box(
                seed: u64,
                w in 100.0f64..2000.0,
                h in 100.0f64..2000.0,
                px in -100.0f64..2100.0,
                py in -100.0f64..2100.0,
            ) {
                let mut field = NodeField::new(FieldConfig::default(), seed);
                field.reset(w, h);
                field.set_pointer(DVec2::new(px, py));
                for _ in 0..50 {
                    field.advance();
                }
                // Repulsion can push at most `repulsion_strength` past the box.
                let slack = 20.0 + 0.3 + 1e-9;
                for node in field.nodes() {
                    prop_assert!(node.position.is_finite());
                    prop_assert!(node.position.x >= -slack && node.position.x <= w + slack);
                    prop_assert!(node.position.y >= -slack && node.position.y <= h + slack);
                }
            }
        }
    }
}
