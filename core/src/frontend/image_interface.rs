//! Image decode/encode capability
//!
//! The emulated system reads and writes PNG files (e.g. for the camera
//! service's picture store). The codec lives in the frontend.

use std::path::Path;

use thiserror::Error;

/// Decoded image as tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major
    pub rgba: Vec<u8>,
}

/// Errors raised by image backends.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Checks that `rgba` matches `width * height` RGBA pixels.
pub fn check_rgba_len(rgba: &[u8], width: u32, height: u32) -> Result<(), ImageError> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(ImageError::BufferSize {
            width,
            height,
            expected,
            actual: rgba.len(),
        });
    }
    Ok(())
}

/// Frontend PNG codec.
pub trait ImageInterface: Send + Sync {
    /// Decode the PNG at `path` into RGBA8 pixels.
    fn decode_png(&self, path: &Path) -> Result<DecodedImage, ImageError>;

    /// Encode RGBA8 pixels as a PNG at `path`.
    fn encode_png(&self, path: &Path, rgba: &[u8], width: u32, height: u32)
    -> Result<(), ImageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_rgba_len() {
        assert!(check_rgba_len(&[0; 16], 2, 2).is_ok());
        let err = check_rgba_len(&[0; 15], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            ImageError::BufferSize {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }
}
