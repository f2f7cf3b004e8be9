//! Camera backed by a still picture on disk
//!
//! The picture is decoded in a detached task when the camera is created.
//! Until decoding finishes (or if it fails) the camera serves blank frames.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use ferrite_core::DetachedTasks;
use ferrite_core::frontend::camera::{
    BlankCamera, CameraFactory, CameraInterface, Effect, Flip, FrameRate, OutputFormat, Resolution,
};
use image::RgbaImage;

use super::util::render_frame;

type ImageSlot = Arc<OnceLock<RgbaImage>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameKey {
    resolution: Resolution,
    flip: Flip,
    format: OutputFormat,
}

pub struct StillImageCamera {
    image: ImageSlot,
    /// Flip configured by the user, combined with the one the game asks for
    base_flip: Flip,
    key: FrameKey,
    cached: Option<(FrameKey, Vec<u16>)>,
    blank: BlankCamera,
}

impl StillImageCamera {
    fn new(image: ImageSlot, base_flip: Flip, flip: Flip) -> Self {
        Self {
            image,
            base_flip,
            key: FrameKey {
                resolution: Resolution::default(),
                flip,
                format: OutputFormat::default(),
            },
            cached: None,
            blank: BlankCamera::new(),
        }
    }

    /// Whether the picture has been decoded.
    pub fn is_loaded(&self) -> bool {
        self.image.get().is_some()
    }
}

impl CameraInterface for StillImageCamera {
    fn start_capture(&mut self) {}

    fn stop_capture(&mut self) {}

    fn set_resolution(&mut self, resolution: Resolution) {
        self.key.resolution = resolution;
        self.blank.set_resolution(resolution);
    }

    fn set_flip(&mut self, flip: Flip) {
        self.key.flip = flip;
    }

    fn set_effect(&mut self, _effect: Effect) {}

    fn set_format(&mut self, format: OutputFormat) {
        self.key.format = format;
        self.blank.set_format(format);
    }

    fn set_frame_rate(&mut self, _frame_rate: FrameRate) {}

    fn receive_frame(&mut self) -> Vec<u16> {
        let Some(image) = self.image.get() else {
            return self.blank.receive_frame();
        };
        if let Some((key, frame)) = &self.cached
            && *key == self.key
        {
            return frame.clone();
        }
        let frame = render_frame(
            image,
            self.key.resolution,
            self.base_flip.combine(self.key.flip),
            self.key.format,
        );
        self.cached = Some((self.key, frame.clone()));
        frame
    }

    fn is_preview_available(&mut self) -> bool {
        self.is_loaded()
    }
}

/// Factory for [`StillImageCamera`].
///
/// A non-empty camera config string names the picture; otherwise the
/// configured default picture is used.
pub struct StillImageCameraFactory {
    default_path: Option<PathBuf>,
    base_flip: Flip,
    tasks: DetachedTasks,
}

impl StillImageCameraFactory {
    pub fn new(default_path: Option<PathBuf>, base_flip: Flip, tasks: DetachedTasks) -> Self {
        Self {
            default_path,
            base_flip,
            tasks,
        }
    }

    fn load(&self, path: PathBuf, slot: ImageSlot) {
        let task_path = path.clone();
        let result = self.tasks.add_task("camera-image", move || {
            match image::open(&task_path) {
                Ok(picture) => {
                    let picture = picture.into_rgba8();
                    tracing::info!(
                        "Loaded camera image {} ({}x{})",
                        task_path.display(),
                        picture.width(),
                        picture.height()
                    );
                    let _ = slot.set(picture);
                }
                Err(e) => {
                    tracing::error!("Failed to load camera image {}: {}", task_path.display(), e);
                }
            }
        });
        if let Err(e) = result {
            tracing::error!("Could not start loading {}: {}", path.display(), e);
        }
    }
}

impl CameraFactory for StillImageCameraFactory {
    fn create(&self, config: &str, flip: Flip) -> Box<dyn CameraInterface> {
        let slot = ImageSlot::default();
        let path = if config.is_empty() {
            self.default_path.clone()
        } else {
            Some(PathBuf::from(config))
        };
        match path {
            Some(path) => self.load(path, Arc::clone(&slot)),
            None => tracing::warn!("No camera image configured, serving blank frames"),
        }
        Box::new(StillImageCamera::new(slot, self.base_flip, flip))
    }
}
