//! Thumbnail to JPEG cover conversion

use crate::error::CoverError;
use image::ImageFormat;
use std::path::Path;
use tracing::debug;

/// Decode a thumbnail in whatever format the server sent and write it as
/// JPEG. Alpha is dropped since JPEG has no alpha channel.
pub fn write_jpeg(image_data: &[u8], dest: &Path) -> Result<(), CoverError> {
    let image = image::load_from_memory(image_data)?;
    image.to_rgb8().save_with_format(dest, ImageFormat::Jpeg)?;
    debug!("Cover written to: {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 6, Rgba([200, 40, 40, 128]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_png_with_alpha_becomes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("cover.jpg");

        write_jpeg(&png_bytes(), &dest).unwrap();

        let written = std::fs::read(&dest).unwrap();
        assert_eq!(&written[..3], &[0xFF, 0xD8, 0xFF]);
        let decoded = image::load_from_memory(&written).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("cover.jpg");

        let err = write_jpeg(b"<html>not an image</html>", &dest).unwrap_err();
        assert!(matches!(err, CoverError::Image(_)));
        assert!(!dest.exists());
    }
}
