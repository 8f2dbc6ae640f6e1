#![deny(unsafe_code)]
//! CPU rasterizer for the node field.
//!
//! [`Raster`] implements [`Surface`] over a float RGBA buffer so a frame can
//! be rendered without a browser, e.g. by the CLI. It follows 2D canvas
//! conventions: drawing coordinates are CSS pixels, the buffer holds
//! `floor(css * dpr)` device pixels, and every primitive is composited
//! source-over with straight alpha.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use std::ops::Range;

use glam::DVec2;
use node_field_core::{FieldError, Rgba, Surface, SurfaceSize};
use tracing::debug;

/// Straight (non-premultiplied) RGBA, each channel in [0, 1].
pub type Pixel = [f64; 4];

/// A software [`Surface`] backed by a device-pixel buffer.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    scale: f64,
    background: Rgba,
    pixels: Vec<Pixel>,
}

impl Raster {
    /// Allocates a raster for `size`, cleared to `background`.
    ///
    /// `clear` restores `background` rather than full transparency so a
    /// snapshot shows the page color the effect would sit on.
    pub fn new(size: SurfaceSize, background: Rgba) -> Result<Self, FieldError> {
        let (width, height) = size.backing();
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(FieldError::InvalidDimensions)?;
        debug!(width, height, scale = size.scale(), "raster allocated");
        Ok(Self {
            width,
            height,
            scale: size.scale(),
            background,
            pixels: vec![to_pixel(background, 1.0); len],
        })
    }

    /// A raster that clears to full transparency, like a fresh canvas.
    pub fn transparent(size: SurfaceSize) -> Result<Self, FieldError> {
        Self::new(size, Rgba::TRANSPARENT)
    }

    /// Buffer width in device pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in device pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Device pixels per CSS pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Row-major device pixels, straight alpha.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at device coordinates, `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Device-pixel rows and columns touched by a device-space box.
    fn span(&self, min: DVec2, max: DVec2) -> Option<(Range<u32>, Range<u32>)> {
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }
        let clip = |lo: f64, hi: f64, extent: u32| {
            let start = lo.floor().max(0.0);
            let end = hi.ceil().min(extent as f64);
            (start < end).then(|| start as u32..end as u32)
        };
        Some((
            clip(min.x, max.x, self.width)?,
            clip(min.y, max.y, self.height)?,
        ))
    }

    /// Composites `color` over every pixel in the box, weighted by
    /// `coverage(pixel_center)`.
    fn composite(
        &mut self,
        min: DVec2,
        max: DVec2,
        color: Rgba,
        coverage: impl Fn(DVec2) -> f64,
    ) {
        let Some((xs, ys)) = self.span(min, max) else {
            return;
        };
        let stride = self.width as usize;
        for y in ys {
            for x in xs.clone() {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let weight = coverage(center);
                if weight > 0.0 {
                    let dst = &mut self.pixels[y as usize * stride + x as usize];
                    *dst = source_over(*dst, color, weight.min(1.0));
                }
            }
        }
    }
}

fn to_pixel(color: Rgba, weight: f64) -> Pixel {
    [color.color.r, color.color.g, color.color.b, color.alpha * weight]
}

/// Source-over with straight alpha.
fn source_over(dst: Pixel, color: Rgba, weight: f64) -> Pixel {
    let [sr, sg, sb, sa] = to_pixel(color, weight);
    let da = dst[3];
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0.0; 4];
    }
    let mix = |s: f64, d: f64| (s * sa + d * da * (1.0 - sa)) / out_a;
    [mix(sr, dst[0]), mix(sg, dst[1]), mix(sb, dst[2]), out_a]
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for Raster {
    fn clear(&mut self) {
        self.pixels.fill(to_pixel(self.background, 1.0));
    }

    fn line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        let device_width = width * self.scale;
        if !(device_width > 0.0) {
            return;
        }
        let (a, b) = (from * self.scale, to * self.scale);
        // Hairlines cover one pixel at reduced strength.
        let half = (device_width / 2.0).max(0.5);
        let strength = device_width.min(1.0);
        let pad = DVec2::splat(half + 1.0);
        self.composite(a.min(b) - pad, a.max(b) + pad, color, |p| {
            (half + 0.5 - segment_distance(p, a, b)).clamp(0.0, 1.0) * strength
        });
    }

    fn radial_glow(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let r = radius * self.scale;
        if !(r > 0.0) {
            return;
        }
        let c = center * self.scale;
        let pad = DVec2::splat(r);
        self.composite(c - pad, c + pad, color, |p| (1.0 - p.distance(c) / r).max(0.0));
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let r = radius * self.scale;
        if !(r > 0.0) {
            return;
        }
        let c = center * self.scale;
        let pad = DVec2::splat(r + 1.0);
        self.composite(c - pad, c + pad, color, |p| {
            (r + 0.5 - p.distance(c)).clamp(0.0, 1.0)
        });
    }
}
