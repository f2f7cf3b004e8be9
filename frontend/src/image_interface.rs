//! PNG codec backed by the `image` crate

use std::path::Path;

use ferrite_core::frontend::image_interface::{
    DecodedImage, ImageError, ImageInterface, check_rgba_len,
};
use image::{ImageFormat, RgbaImage};

/// Registry key of [`PngImageInterface`].
pub const PNG_IMAGE_INTERFACE: &str = "png";

#[derive(Debug, Default)]
pub struct PngImageInterface;

impl ImageInterface for PngImageInterface {
    fn decode_png(&self, path: &Path) -> Result<DecodedImage, ImageError> {
        let decode_error = |reason: String| ImageError::Decode {
            path: path.display().to_string(),
            reason,
        };
        let mut reader =
            image::ImageReader::open(path).map_err(|e| decode_error(e.to_string()))?;
        reader.set_format(ImageFormat::Png);
        let image = reader
            .decode()
            .map_err(|e| decode_error(e.to_string()))?
            .into_rgba8();

        Ok(DecodedImage {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    fn encode_png(
        &self,
        path: &Path,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        check_rgba_len(rgba, width, height)?;
        let encode_error = |reason: String| ImageError::Encode {
            path: path.display().to_string(),
            reason,
        };
        let image = RgbaImage::from_raw(width, height, rgba.to_vec())
            .ok_or_else(|| encode_error("pixel buffer does not match dimensions".to_string()))?;
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| encode_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_then_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let rgba: Vec<u8> = (0..2 * 3 * 4).map(|i| i as u8).collect();

        PngImageInterface.encode_png(&path, &rgba, 2, 3).unwrap();
        let decoded = PngImageInterface.decode_png(&path).unwrap();

        assert_eq!((decoded.width, decoded.height), (2, 3));
        assert_eq!(decoded.rgba, rgba);
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let err = PngImageInterface
            .encode_png(&dir.path().join("bad.png"), &[0; 7], 2, 1)
            .unwrap_err();
        assert!(matches!(err, ImageError::BufferSize { expected: 8, .. }));
    }

    #[test]
    fn test_decode_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PngImageInterface
            .decode_png(&dir.path().join("missing.png"))
            .unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
    }
}
