//! Field state and the initializer that populates it.
//!
//! A [`NodeField`] owns everything one mounted background needs between
//! frames: the nodes, the last pointer position, simulated time, the logical
//! surface size and the random source used when the field is rebuilt.
//! The per-frame simulation and drawing live in [`crate::sim`] and
//! [`crate::render`].

use std::f64::consts::TAU;

use glam::DVec2;
use serde_json::Value;
use tracing::debug;

use crate::config::FieldConfig;
use crate::effect::Effect;
use crate::node::{Layer, Node};
use crate::prng::{RandomSource, Xorshift64};
use crate::surface::Surface;

/// Node count for a surface: `min(floor(w * h / divisor), max_nodes)`.
///
/// Zero, negative and non-finite dimensions give an empty field.
pub fn node_count(width: f64, height: f64, config: &FieldConfig) -> usize {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return 0;
    }
    let by_density = (width * height / config.density_divisor).floor();
    if by_density >= config.max_nodes as f64 {
        config.max_nodes
    } else {
        by_density as usize
    }
}

/// `floor(count * share)`, tolerant of shares like 0.7 that are not exact in
/// binary (0.7 * 10 must give 7, not 6).
fn share_of(count: usize, share: f64) -> usize {
    let exact = count as f64 * share;
    let nearest = exact.round();
    if (exact - nearest).abs() < 1e-9 {
        nearest as usize
    } else {
        exact.floor() as usize
    }
}

/// Layer of the node at `index` in a field of `count` nodes.
///
/// The first `floor(count * deep_share)` nodes are deep, nodes below
/// `floor(count * mid_share)` are mid, the rest are foreground.
pub fn layer_for(index: usize, count: usize, config: &FieldConfig) -> Layer {
    if index < share_of(count, config.deep_share) {
        Layer::Deep
    } else if index < share_of(count, config.mid_share) {
        Layer::Mid
    } else {
        Layer::Foreground
    }
}

/// Builds a fresh node set for a `width` x `height` surface.
pub fn populate(
    width: f64,
    height: f64,
    config: &FieldConfig,
    rng: &mut impl RandomSource,
) -> Vec<Node> {
    let count = node_count(width, height, config);
    (0..count)
        .map(|i| {
            let layer = layer_for(i, count, config);
            let w = layer.weight();
            let speed = config.base_speed + w * config.speed_per_layer;
            let position = DVec2::new(rng.unit() * width, rng.unit() * height);
            let velocity = DVec2::new(rng.range(-0.5, 0.5) * speed, rng.range(-0.5, 0.5) * speed);
            let radius = config.base_radius
                + w * config.radius_per_layer
                + rng.range(0.0, config.radius_jitter);
            let pulse_phase = rng.unit() * TAU;
            Node {
                position,
                velocity,
                radius,
                pulse_phase,
                layer,
            }
        })
        .collect()
}

/// The simulated node field.
pub struct NodeField {
    pub(crate) config: FieldConfig,
    pub(crate) nodes: Vec<Node>,
    pub(crate) pointer: Option<DVec2>,
    pub(crate) time: f64,
    pub(crate) size: DVec2,
    rng: Xorshift64,
}

impl NodeField {
    /// An empty field; call [`NodeField::reset`] once the surface size is known.
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            pointer: None,
            time: 0.0,
            size: DVec2::ZERO,
            rng: Xorshift64::new(seed),
        }
    }

    /// Creates a field from JSON overrides, see [`FieldConfig::from_json`].
    pub fn from_json(params: &Value, seed: u64) -> Result<Self, crate::FieldError> {
        Ok(Self::new(FieldConfig::from_json(params)?, seed))
    }

    /// Discards every node and repopulates for a `width` x `height` surface.
    ///
    /// Pointer and simulated time survive; nodes do not keep any identity.
    pub fn reset(&mut self, width: f64, height: f64) {
        self.size = DVec2::new(width.max(0.0), height.max(0.0));
        self.nodes = populate(self.size.x, self.size.y, &self.config, &mut self.rng);
        debug!(width, height, nodes = self.nodes.len(), "node field reset");
    }

    /// Records the latest pointer position in CSS pixels.
    pub fn set_pointer(&mut self, pointer: DVec2) {
        self.pointer = Some(pointer);
    }

    /// Last pointer position, `None` until the pointer has moved.
    pub fn pointer(&self) -> Option<DVec2> {
        self.pointer
    }

    /// Nodes in creation order; layers are contiguous.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable node access for hosts that place nodes themselves.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Parameters this field was built with.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Simulated time, advanced by `time_step` each frame.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Logical width in CSS pixels.
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Logical height in CSS pixels.
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Count of nodes per layer, indexed by [`Layer::index`].
    pub fn layer_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for node in &self.nodes {
            counts[node.layer.index()] += 1;
        }
        counts
    }
}

impl Effect for NodeField {
    fn resize(&mut self, width: f64, height: f64) {
        self.reset(width, height);
    }

    fn pointer_moved(&mut self, position: DVec2) {
        self.set_pointer(position);
    }

    fn step(&mut self) {
        self.advance();
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.draw(surface);
    }

    fn params(&self) -> Value {
        self.config.to_json()
    }

    fn param_schema(&self) -> Value {
        FieldConfig::param_schema()
    }

    fn population(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(width: f64, height: f64, seed: u64) -> NodeField {
        let mut f = NodeField::new(FieldConfig::default(), seed);
        f.reset(width, height);
        f
    }

    #[test]
    fn scenario_1000_by_800() {
        let f = field(1000.0, 800.0, 42);
        assert_eq!(f.nodes().len(), 66);
        assert_eq!(f.layer_counts(), [19, 27, 20]);
    }

    #[test]
    fn count_is_capped() {
        let f = field(4000.0, 3000.0, 1);
        assert_eq!(f.nodes().len(), 120);
    }

    #[test]
    fn zero_area_gives_empty_field() {
        assert!(field(0.0, 800.0, 1).nodes().is_empty());
        assert!(field(1000.0, 0.0, 1).nodes().is_empty());
        assert_eq!(node_count(f64::NAN, 100.0, &FieldConfig::default()), 0);
        assert_eq!(node_count(-50.0, 100.0, &FieldConfig::default()), 0);
        assert_eq!(node_count(f64::INFINITY, 100.0, &FieldConfig::default()), 0);
    }

    #[test]
    fn layer_boundaries_for_ten_nodes() {
        let config = FieldConfig::default();
        let layers: Vec<Layer> = (0..10).map(|i| layer_for(i, 10, &config)).collect();
        assert_eq!(&layers[..3], &[Layer::Deep; 3]);
        assert_eq!(&layers[3..7], &[Layer::Mid; 4]);
        assert_eq!(&layers[7..], &[Layer::Foreground; 3]);
    }

    #[test]
    fn initial_nodes_follow_layer_coefficients() {
        let f = field(1200.0, 900.0, 7);
        let config = f.config().clone();
        for node in f.nodes() {
            let w = node.layer.weight();
            let half_speed = (config.base_speed + w * config.speed_per_layer) / 2.0;
            assert!(node.velocity.x.abs() <= half_speed && node.velocity.y.abs() <= half_speed);
            let min_r = config.base_radius + w * config.radius_per_layer;
            assert!(node.radius >= min_r && node.radius <= min_r + config.radius_jitter);
            assert!((0.0..TAU).contains(&node.pulse_phase));
            assert!((0.0..1200.0).contains(&node.position.x));
            assert!((0.0..900.0).contains(&node.position.y));
        }
    }

    #[test]
    fn reset_replaces_nodes_and_keeps_pointer() {
        let mut f = field(1000.0, 800.0, 3);
        f.set_pointer(DVec2::new(10.0, 10.0));
        let before = f.nodes().to_vec();
        f.reset(600.0, 400.0);
        assert_eq!(f.nodes().len(), 20);
        assert_ne!(f.nodes()[0], before[0]);
        assert_eq!(f.pointer(), Some(DVec2::new(10.0, 10.0)));
        assert!((f.width() - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn same_seed_same_field() {
        let a = field(900.0, 700.0, 99);
        let b = field(900.0, 700.0, 99);
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn from_json_rejects_bad_params() {
        assert!(NodeField::from_json(&json!({"max_nodes": -1}), 1).is_err());
        let f = NodeField::from_json(&json!({"max_nodes": 5}), 1).unwrap();
        assert_eq!(f.config().max_nodes, 5);
    }

    #[test]
    fn pointer_starts_inert() {
        let f = NodeField::new(FieldConfig::default(), 1);
        assert!(f.pointer().is_none());
        assert!(f.nodes().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn count_matches_formula(w in 0u32..5000, h in 0u32..5000) {
                let config = FieldConfig::default();
                let expected = ((w as u64 * h as u64) / 12_000).min(120) as usize;
                prop_assert_eq!(node_count(w as f64, h as f64, &config), expected);
            }

            #[test]
            fn layers_partition_by_floor(count in 0usize..=120) {
                let config = FieldConfig::default();
                let mut counts = [0usize; 3];
                for i in 0..count {
                    counts[layer_for(i, count, &config).index()] += 1;
                }
                prop_assert_eq!(counts[0], count * 3 / 10);
                prop_assert_eq!(counts[2], count - count * 7 / 10);
                prop_assert_eq!(counts.iter().sum::<usize>(), count);
            }

            #[test]
            fn populated_positions_are_finite(w in 0.0f64..3000.0, h in 0.0f64..3000.0, seed: u64) {
                let f = field(w, h, seed);
                for node in f.nodes() {
                    prop_assert!(node.position.is_finite());
                    prop_assert!(node.velocity.is_finite());
                }
            }
        }
    }
}
