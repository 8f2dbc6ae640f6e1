//! PNG export of a [`Raster`].
//!
//! Feature-gated behind `png` (default on) so browser builds never pull in
//! the `image` crate. Byte conversion lives in [`crate::pixel`].

use std::path::Path;

use node_field_core::FieldError;
use tracing::info;

use crate::pixel::to_rgba8;
use crate::Raster;

/// Writes the raster as an RGBA PNG at its device resolution.
///
/// Returns `FieldError::Io` if the buffer does not match the dimensions or
/// the file cannot be written.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), FieldError> {
    let img = image::RgbaImage::from_raw(raster.width(), raster.height(), to_rgba8(raster))
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))?;
    info!(path = %path.display(), width = raster.width(), height = raster.height(), "snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use node_field_core::{Rgb, Surface, SurfaceSize};

    #[test]
    fn write_png_round_trip() {
        let mut raster = Raster::new(
            SurfaceSize::new(16.0, 12.0, 2.0),
            Rgb::from_u8(0, 0, 0).with_alpha(1.0),
        )
        .unwrap();
        raster.fill_circle(DVec2::new(8.0, 6.0), 3.0, Rgb::from_u8(255, 0, 0).with_alpha(1.0));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&raster, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (32, 24));
        assert_eq!(img.get_pixel(16, 12).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let raster = Raster::transparent(SurfaceSize::new(2.0, 2.0, 1.0)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        assert!(matches!(write_png(&raster, &path), Err(FieldError::Io(_))));
    }
}
