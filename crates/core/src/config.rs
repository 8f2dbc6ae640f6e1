//! Tunable constants of the node field.
//!
//! Every field of [`FieldConfig`] has a default, so a JSON object only needs
//! to name the values it overrides. [`FieldConfig::param_schema`] describes
//! the numeric parameters for UIs and the CLI.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::color::Rgb;
use crate::error::FieldError;

/// Numeric parameters with their accepted range and a description.
///
/// Order matches the struct so the schema reads top to bottom like the
/// pipeline: density, motion, edges, nodes.
const NUMERIC_PARAMS: &[(&str, f64, f64, &str)] = &[
    ("density_divisor", 1.0, 1.0e6, "Surface area (px²) per node"),
    ("max_nodes", 0.0, 1000.0, "Upper bound on node count"),
    ("deep_share", 0.0, 1.0, "Fraction of nodes on the deep layer"),
    ("mid_share", 0.0, 1.0, "Cumulative fraction of nodes on deep + mid layers"),
    ("base_speed", 0.0, 10.0, "Velocity spread of deep nodes"),
    ("speed_per_layer", 0.0, 10.0, "Extra velocity spread per layer"),
    ("base_radius", 0.0, 50.0, "Core radius of deep nodes"),
    ("radius_per_layer", 0.0, 50.0, "Extra core radius per layer"),
    ("radius_jitter", 0.0, 50.0, "Random extra core radius"),
    ("wrap_margin", 0.0, 500.0, "Overscan before a node wraps to the opposite edge"),
    ("time_step", 0.0, 1.0, "Simulated time added per frame"),
    ("repulsion_radius", 0.0, 2000.0, "Pointer distance below which nodes are pushed"),
    ("repulsion_strength", 0.0, 10.0, "Displacement at zero pointer distance"),
    ("connection_distance", 0.0, 2000.0, "Edge length limit between deep nodes"),
    ("connection_per_layer", 0.0, 500.0, "Extra edge length per shared layer"),
    ("edge_alpha", 0.0, 1.0, "Edge opacity at zero length for deep nodes"),
    ("edge_alpha_per_layer", 0.0, 1.0, "Extra edge opacity per shared layer"),
    ("edge_width", 0.0, 20.0, "Edge line width for deep nodes"),
    ("edge_width_per_layer", 0.0, 20.0, "Extra edge line width per shared layer"),
    ("edge_pulse_rate", 0.0, 100.0, "Angular rate of the edge pulse"),
    ("node_pulse_rate", 0.0, 100.0, "Angular rate of the node pulse"),
    ("glow_scale", 0.0, 50.0, "Glow radius as a multiple of the core radius"),
    ("glow_pulse_scale", 0.0, 50.0, "Glow radius growth at full pulse"),
    ("node_alpha", 0.0, 1.0, "Glow opacity of deep nodes"),
    ("node_alpha_per_layer", 0.0, 1.0, "Extra glow opacity per layer"),
    ("node_alpha_pulse", 0.0, 1.0, "Glow opacity added at full pulse"),
    ("core_alpha_boost", 0.0, 1.0, "Core opacity above the glow opacity"),
];

/// Color parameters, in schema order.
const COLOR_PARAMS: &[(&str, &str)] = &[
    ("edge_color", "Edge tone between low-layer nodes"),
    ("edge_accent_color", "Edge tone when the layer sum exceeds 2"),
    ("layer_colors", "Node tones for the deep, mid and foreground layers"),
];

/// All constants of the node field, defaulting to the reference look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    pub density_divisor: f64,
    pub max_nodes: usize,
    pub deep_share: f64,
    pub mid_share: f64,

    pub base_speed: f64,
    pub speed_per_layer: f64,
    pub base_radius: f64,
    pub radius_per_layer: f64,
    pub radius_jitter: f64,
    pub wrap_margin: f64,
    pub time_step: f64,
    pub repulsion_radius: f64,
    pub repulsion_strength: f64,

    pub connection_distance: f64,
    pub connection_per_layer: f64,
    pub edge_alpha: f64,
    pub edge_alpha_per_layer: f64,
    pub edge_width: f64,
    pub edge_width_per_layer: f64,
    pub edge_pulse_rate: f64,

    pub node_pulse_rate: f64,
    pub glow_scale: f64,
    pub glow_pulse_scale: f64,
    pub node_alpha: f64,
    pub node_alpha_per_layer: f64,
    pub node_alpha_pulse: f64,
    pub core_alpha_boost: f64,

    pub edge_color: Rgb,
    pub edge_accent_color: Rgb,
    pub layer_colors: [Rgb; 3],
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_divisor: 12_000.0,
            max_nodes: 120,
            deep_share: 0.3,
            mid_share: 0.7,

            base_speed: 0.15,
            speed_per_layer: 0.1,
            base_radius: 1.5,
            radius_per_layer: 1.0,
            radius_jitter: 1.5,
            wrap_margin: 20.0,
            time_step: 0.005,
            repulsion_radius: 150.0,
            repulsion_strength: 0.3,

            connection_distance: 120.0,
            connection_per_layer: 30.0,
            edge_alpha: 0.08,
            edge_alpha_per_layer: 0.04,
            edge_width: 0.5,
            edge_width_per_layer: 0.3,
            edge_pulse_rate: 3.0,

            node_pulse_rate: 2.0,
            glow_scale: 3.0,
            glow_pulse_scale: 2.0,
            node_alpha: 0.3,
            node_alpha_per_layer: 0.15,
            node_alpha_pulse: 0.2,
            core_alpha_boost: 0.2,

            edge_color: Rgb::from_u8(59, 130, 246),
            edge_accent_color: Rgb::from_u8(34, 211, 238),
            layer_colors: [
                Rgb::from_u8(59, 130, 246),
                Rgb::from_u8(96, 165, 250),
                Rgb::from_u8(34, 211, 238),
            ],
        }
    }
}

impl FieldConfig {
    /// Applies a JSON object of overrides on top of the defaults and validates
    /// the result. `null` is treated like `{}`.
    pub fn from_json(params: &Value) -> Result<Self, FieldError> {
        let config: FieldConfig = match params {
            Value::Null => FieldConfig::default(),
            Value::Object(_) => serde_json::from_value(params.clone())?,
            other => {
                return Err(FieldError::InvalidParams(format!(
                    "expected a JSON object, got {other}"
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Current values as a JSON object (colors as hex strings).
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Rejects values the simulation cannot use.
    pub fn validate(&self) -> Result<(), FieldError> {
        let current = self.to_json();
        for &(name, min, max, _) in NUMERIC_PARAMS {
            let v = current.get(name).and_then(Value::as_f64).unwrap_or(f64::NAN);
            if !v.is_finite() {
                return Err(FieldError::param(name, "must be a finite number"));
            }
            if v < min || v > max {
                return Err(FieldError::param(
                    name,
                    format!("{v} is outside [{min}, {max}]"),
                ));
            }
        }
        if self.deep_share > self.mid_share {
            return Err(FieldError::param(
                "deep_share",
                format!(
                    "{} must not exceed mid_share ({})",
                    self.deep_share, self.mid_share
                ),
            ));
        }
        Ok(())
    }

    /// Schema for every parameter: type, default, range and description.
    pub fn param_schema() -> Value {
        let defaults = FieldConfig::default().to_json();
        let mut schema = Map::new();
        for &(name, min, max, description) in NUMERIC_PARAMS {
            let kind = if name == "max_nodes" { "integer" } else { "number" };
            schema.insert(
                name.to_owned(),
                json!({
                    "type": kind,
                    "default": defaults[name],
                    "min": min,
                    "max": max,
                    "description": description,
                }),
            );
        }
        for &(name, description) in COLOR_PARAMS {
            let kind = if name == "layer_colors" { "color[3]" } else { "color" };
            schema.insert(
                name.to_owned(),
                json!({
                    "type": kind,
                    "default": defaults[name],
                    "description": description,
                }),
            );
        }
        Value::Object(schema)
    }
}
