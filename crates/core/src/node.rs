//! A single simulated point of the field.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Visual depth tier of a node.
///
/// Higher layers move faster, draw larger and brighter, and connect over
/// longer distances. Ordering follows depth: `Deep < Mid < Foreground`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Deep,
    Mid,
    Foreground,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Deep, Layer::Mid, Layer::Foreground];

    /// Tier number in {0, 1, 2}.
    pub fn index(self) -> usize {
        match self {
            Layer::Deep => 0,
            Layer::Mid => 1,
            Layer::Foreground => 2,
        }
    }

    /// Tier number as a scale factor for per-layer coefficients.
    pub fn weight(self) -> f64 {
        self.index() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub position: DVec2,
    /// Fixed after creation. Pointer repulsion moves `position` directly.
    pub velocity: DVec2,
    pub radius: f64,
    /// Phase offset in [0, 2π) for the opacity pulse.
    pub pulse_phase: f64,
    pub layer: Layer,
}

impl Node {
    /// Pulse term in [0, 1] for the given simulated time and angular rate.
    pub fn pulse(&self, time: f64, rate: f64) -> f64 {
        (time * rate + self.pulse_phase).sin() * 0.5 + 0.5
    }
}
