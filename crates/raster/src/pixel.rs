//! Conversion of a [`Raster`] into 8-bit RGBA bytes.
//!
//! Always available (no feature gate) so callers without the `png` feature
//! can still hand the bytes to their own encoder or an `ImageData`.

use crate::{Pixel, Raster};

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn pixel_to_rgba8(p: &Pixel) -> [u8; 4] {
    [channel(p[0]), channel(p[1]), channel(p[2]), channel(p[3])]
}

/// Row-major RGBA8 bytes, straight alpha, `width * height * 4` long.
pub fn to_rgba8(raster: &Raster) -> Vec<u8> {
    raster.pixels().iter().flat_map(pixel_to_rgba8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use node_field_core::{Rgb, Surface, SurfaceSize};

    #[test]
    fn byte_length_matches_backing_store() {
        let raster = Raster::transparent(SurfaceSize::new(8.0, 4.0, 2.0)).unwrap();
        assert_eq!(to_rgba8(&raster).len(), 16 * 8 * 4);
    }

    #[test]
    fn background_and_paint_quantize() {
        let bg = Rgb::from_hex("#0a0a0f").unwrap().with_alpha(1.0);
        let mut raster = Raster::new(SurfaceSize::new(6.0, 6.0, 1.0), bg).unwrap();
        assert_eq!(&to_rgba8(&raster)[..4], &[10, 10, 15, 255]);

        raster.fill_circle(DVec2::new(3.0, 3.0), 2.0, Rgb::from_u8(34, 211, 238).with_alpha(1.0));
        let bytes = to_rgba8(&raster);
        let center = (3 * 6 + 3) * 4;
        assert_eq!(&bytes[center..center + 4], &[34, 211, 238, 255]);
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(pixel_to_rgba8(&[1.2, -0.1, 0.5, 1.0]), [255, 0, 128, 255]);
    }
}
