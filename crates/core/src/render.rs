//! Drawing the field: proximity edges first, then glowing nodes on top.

use glam::DVec2;

use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::field::NodeField;
use crate::node::Node;
use crate::surface::Surface;

/// A visible connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: DVec2,
    pub to: DVec2,
    pub width: f64,
    pub color: Rgba,
}

/// Longest edge between two nodes, set by the shallower of their layers.
pub fn max_distance(a: &Node, b: &Node, config: &FieldConfig) -> f64 {
    let shared = a.layer.min(b.layer).weight();
    config.connection_distance + shared * config.connection_per_layer
}

/// The edge drawn between `a` and `b` at simulated `time`, if they are close
/// enough. The pulse follows `a`, the lower-indexed node of the pair.
pub fn edge_between(a: &Node, b: &Node, time: f64, config: &FieldConfig) -> Option<Edge> {
    let max = max_distance(a, b, config);
    let d = a.position.distance(b.position);
    if d >= max {
        return None;
    }
    let shared = a.layer.min(b.layer).weight();
    let fade = (1.0 - d / max) * (config.edge_alpha + shared * config.edge_alpha_per_layer);
    let pulse = a.pulse(time, config.edge_pulse_rate);
    let tone = if a.layer.index() + b.layer.index() > 2 {
        config.edge_accent_color
    } else {
        config.edge_color
    };
    Some(Edge {
        from: a.position,
        to: b.position,
        width: config.edge_width + shared * config.edge_width_per_layer,
        color: tone.with_alpha(fade * (0.6 + pulse * 0.4)),
    })
}

/// Glow radius, glow color and core color of a node at simulated `time`.
pub fn node_paint(node: &Node, time: f64, config: &FieldConfig) -> (f64, Rgba, Rgba) {
    let w = node.layer.weight();
    let pulse = node.pulse(time, config.node_pulse_rate);
    let alpha = config.node_alpha + w * config.node_alpha_per_layer + pulse * config.node_alpha_pulse;
    let tone = config.layer_colors[node.layer.index()];
    let glow_radius = node.radius * (config.glow_scale + pulse * config.glow_pulse_scale);
    (
        glow_radius,
        tone.with_alpha(alpha),
        tone.with_alpha(alpha + config.core_alpha_boost),
    )
}

impl NodeField {
    /// Redraws the whole surface from the current state.
    ///
    /// The edge pass visits every unordered pair, O(n²) in the node count,
    /// which stays under 7140 pairs at the default cap of 120 nodes.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear();

        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                if let Some(edge) = edge_between(a, b, self.time, &self.config) {
                    surface.line(edge.from, edge.to, edge.width, edge.color);
                }
            }
        }

        for node in &self.nodes {
            let (glow_radius, glow, core) = node_paint(node, self.time, &self.config);
            surface.radial_glow(node.position, glow_radius, glow);
            surface.fill_circle(node.position, node.radius, core);
        }
    }
}
