//! Reproducible description of a still render of the field.
//!
//! A [`Scene`] captures everything needed to recreate one frame offline:
//! surface size and pixel ratio, PRNG seed, how many frames to simulate,
//! an optional pointer and parameter overrides. Two equal scenes render
//! bit-identical frames.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::bridge::SurfaceSize;
use crate::error::FieldError;
use crate::field::NodeField;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_pixel_ratio")]
    pub device_pixel_ratio: f64,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<[f64; 2]>,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Scene {
    /// A scene with pixel ratio 1, no frames, no pointer and default params.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: default_pixel_ratio(),
            seed,
            frames: 0,
            pointer: None,
            params: empty_params(),
        }
    }

    /// Rejects zero or overflowing dimensions and unusable pixel ratios.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.width == 0 || self.height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(FieldError::InvalidDimensions)?;
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(FieldError::param(
                "device_pixel_ratio",
                format!("{} is not a positive number", self.device_pixel_ratio),
            ));
        }
        let (w, h) = self.surface_size().backing();
        if w == 0 || h == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        Ok(())
    }

    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(
            self.width as f64,
            self.height as f64,
            self.device_pixel_ratio,
        )
    }

    /// Validates, builds the field, sizes it, places the pointer and runs
    /// `frames` simulation steps.
    pub fn build(&self) -> Result<NodeField, FieldError> {
        self.validate()?;
        let mut field = NodeField::from_json(&self.params, self.seed)?;
        field.reset(self.width as f64, self.height as f64);
        if let Some([x, y]) = self.pointer {
            field.set_pointer(DVec2::new(x, y));
        }
        for _ in 0..self.frames {
            field.advance();
        }
        Ok(field)
    }
}
