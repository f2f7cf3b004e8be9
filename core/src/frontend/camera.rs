//! Camera capability
//!
//! A [`CameraFactory`] builds [`CameraInterface`] instances from a
//! backend-specific configuration string (for the still-image backend this
//! is a file path). Factories are registered by name in a
//! [`CameraRegistry`]; [`create_camera`] resolves a name and falls back to a
//! [`BlankCamera`] when the name is unknown.

use crate::registry::CameraRegistry;

/// Output resolution requested by the emulated camera service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u16,
    pub height: u16,
}

impl Resolution {
    /// VGA, the largest resolution the camera service asks for.
    pub const VGA: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::VGA
    }
}

/// Image flip applied to captured frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    /// Both horizontal and vertical
    Reverse,
}

impl Flip {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Flip::Horizontal | Flip::Reverse)
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Flip::Vertical | Flip::Reverse)
    }

    /// Combine two flips (e.g. a user-configured flip with one requested by the game).
    pub fn combine(self, other: Flip) -> Flip {
        match (
            self.is_horizontal() ^ other.is_horizontal(),
            self.is_vertical() ^ other.is_vertical(),
        ) {
            (false, false) => Flip::None,
            (true, false) => Flip::Horizontal,
            (false, true) => Flip::Vertical,
            (true, true) => Flip::Reverse,
        }
    }
}

/// Color effect requested by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    None,
    Mono,
    Sepia,
    Negative,
    Negafilm,
    Sepia01,
}

/// Pixel format of frames returned by [`CameraInterface::receive_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Packed YUV 4:2:2, two pixels per pair of words
    #[default]
    Yuv422,
    Rgb565,
}

/// Frame rate requested by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameRate {
    #[default]
    Rate15,
    Rate15To5,
    Rate15To2,
    Rate10,
    Rate8_5,
    Rate5,
    Rate20,
    Rate20To5,
    Rate30,
    Rate30To5,
    Rate15To10,
    Rate20To10,
    Rate30To10,
}

/// A camera source.
pub trait CameraInterface: Send {
    /// Start capturing frames.
    fn start_capture(&mut self);

    /// Stop capturing frames.
    fn stop_capture(&mut self);

    /// Set the frame resolution.
    fn set_resolution(&mut self, resolution: Resolution);

    /// Set flipping applied on top of the backend's configured flip.
    fn set_flip(&mut self, flip: Flip);

    /// Set the color effect.
    fn set_effect(&mut self, effect: Effect);

    /// Set the output pixel format.
    fn set_format(&mut self, format: OutputFormat);

    /// Set the frame rate.
    fn set_frame_rate(&mut self, frame_rate: FrameRate);

    /// Receive one frame of `width * height` 16-bit words in the configured format.
    fn receive_frame(&mut self) -> Vec<u16>;

    /// Whether the backend can produce a preview right now.
    fn is_preview_available(&mut self) -> bool;
}

/// Builds cameras for one backend.
pub trait CameraFactory: Send + Sync {
    /// Create a camera for the given backend configuration.
    fn create(&self, config: &str, flip: Flip) -> Box<dyn CameraInterface>;

    /// Create a camera used for a configuration-dialog preview.
    ///
    /// Backends that need a different setup for previews override this;
    /// the default is a regular camera producing RGB565 frames.
    fn create_preview(
        &self,
        config: &str,
        width: u16,
        height: u16,
        flip: Flip,
    ) -> Box<dyn CameraInterface> {
        let mut camera = self.create(config, flip);
        camera.set_resolution(Resolution { width, height });
        camera.set_format(OutputFormat::Rgb565);
        camera
    }
}

/// Camera producing solid black frames.
#[derive(Debug, Default)]
pub struct BlankCamera {
    resolution: Resolution,
    format: OutputFormat,
}

impl BlankCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraInterface for BlankCamera {
    fn start_capture(&mut self) {}

    fn stop_capture(&mut self) {}

    fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    fn set_flip(&mut self, _flip: Flip) {}

    fn set_effect(&mut self, _effect: Effect) {}

    fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    fn set_frame_rate(&mut self, _frame_rate: FrameRate) {}

    fn receive_frame(&mut self) -> Vec<u16> {
        // 0x8000 is black in YUV422 (Y = 0, chroma centered)
        let fill = match self.format {
            OutputFormat::Rgb565 => 0x0000,
            OutputFormat::Yuv422 => 0x8000,
        };
        vec![fill; self.resolution.pixel_count()]
    }

    fn is_preview_available(&mut self) -> bool {
        true
    }
}

/// Factory for [`BlankCamera`], registered under [`BLANK_CAMERA`].
#[derive(Debug, Default)]
pub struct BlankCameraFactory;

impl CameraFactory for BlankCameraFactory {
    fn create(&self, _config: &str, _flip: Flip) -> Box<dyn CameraInterface> {
        Box::new(BlankCamera::new())
    }
}

/// Reserved key of the blank camera backend.
pub const BLANK_CAMERA: &str = "blank";

/// Create a camera through the factory registered under `name`.
///
/// Unknown names fall back to a [`BlankCamera`] so the emulated camera
/// service always has something to talk to.
pub fn create_camera(
    registry: &CameraRegistry,
    name: &str,
    config: &str,
    flip: Flip,
) -> Box<dyn CameraInterface> {
    match registry.lookup(name) {
        Ok(factory) => factory.create(config, flip),
        Err(e) => {
            if name != BLANK_CAMERA {
                tracing::error!("Unknown camera backend: {}", e);
            }
            Box::new(BlankCamera::new())
        }
    }
}

/// Preview counterpart of [`create_camera`].
pub fn create_camera_preview(
    registry: &CameraRegistry,
    name: &str,
    config: &str,
    width: u16,
    height: u16,
    flip: Flip,
) -> Box<dyn CameraInterface> {
    match registry.lookup(name) {
        Ok(factory) => factory.create_preview(config, width, height, flip),
        Err(e) => {
            if name != BLANK_CAMERA {
                tracing::error!("Unknown camera backend: {}", e);
            }
            let mut camera = BlankCamera::new();
            camera.set_resolution(Resolution { width, height });
            camera.set_format(OutputFormat::Rgb565);
            Box::new(camera)
        }
    }
}
