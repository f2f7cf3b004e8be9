//! Camera backends provided by the desktop frontend

pub mod still_image;
pub mod util;

pub use still_image::{StillImageCamera, StillImageCameraFactory};

/// Registry key of the still-image camera.
pub const IMAGE_CAMERA: &str = "image";
