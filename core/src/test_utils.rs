//! Shared test utilities for unit tests

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::frontend::applets::mii_selector::{MiiData, MiiSelector, MiiSelectorConfig, MiiSelectorData};
use crate::frontend::camera::{
    CameraFactory, CameraInterface, Effect, Flip, FrameRate, OutputFormat, Resolution,
};
use crate::frontend::image_interface::{DecodedImage, ImageError, ImageInterface};
use crate::lifecycle::{ActivityHandler, ActivityState, HostEnvironment, WindowSpec};
use crate::surface::{ContextSharing, SurfaceFormat};

// ============================================================================
// Providers
// ============================================================================

/// Camera whose every frame is a single pixel holding its factory's tag.
pub struct TaggedCamera(pub u32);

impl CameraInterface for TaggedCamera {
    fn start_capture(&mut self) {}
    fn stop_capture(&mut self) {}
    fn set_resolution(&mut self, _resolution: Resolution) {}
    fn set_flip(&mut self, _flip: Flip) {}
    fn set_effect(&mut self, _effect: Effect) {}
    fn set_format(&mut self, _format: OutputFormat) {}
    fn set_frame_rate(&mut self, _frame_rate: FrameRate) {}

    fn receive_frame(&mut self) -> Vec<u16> {
        vec![self.0 as u16]
    }

    fn is_preview_available(&mut self) -> bool {
        true
    }
}

/// Camera factory identifiable through the frames it produces.
pub struct TaggedCameraFactory(pub u32);

impl CameraFactory for TaggedCameraFactory {
    fn create(&self, _config: &str, _flip: Flip) -> Box<dyn CameraInterface> {
        Box::new(TaggedCamera(self.0))
    }
}

/// Mii selector that always picks a Mii whose id is its tag.
pub struct TaggedMiiSelector(pub u32);

impl MiiSelector for TaggedMiiSelector {
    fn setup(&self, _config: &MiiSelectorConfig) -> MiiSelectorData {
        MiiSelectorData::selected(MiiData {
            mii_id: self.0,
            ..MiiData::standard()
        })
    }
}

/// Image interface that decodes every file as a 1x1 white pixel and
/// discards encodes.
pub struct NullImageInterface;

impl ImageInterface for NullImageInterface {
    fn decode_png(&self, _path: &Path) -> Result<DecodedImage, ImageError> {
        Ok(DecodedImage {
            width: 1,
            height: 1,
            rgba: vec![0xFF; 4],
        })
    }

    fn encode_png(
        &self,
        _path: &Path,
        _rgba: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<(), ImageError> {
        Ok(())
    }
}

// ============================================================================
// Headless host
// ============================================================================

/// Window created by [`HeadlessHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub id: usize,
    pub spec: WindowSpec,
    /// Surface format snapshotted at creation
    pub format: SurfaceFormat,
    pub sharing: ContextSharing,
}

/// Host environment without a native event loop.
///
/// `exec` replays the scripted activity changes through the connected
/// handler, runs the optional exec hook, then returns `exit_code`.
#[derive(Default)]
pub struct HeadlessHost {
    pub windows: Vec<HeadlessWindow>,
    /// Ids of windows passed to `show_window`, in order
    pub shown: Vec<usize>,
    pub activity_script: Vec<ActivityState>,
    pub exit_code: i32,
    pub fail_window_creation: bool,
    pub exec_count: usize,
    on_exec: Option<Box<dyn FnMut()>>,
    handler: Option<ActivityHandler>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn with_activity(mut self, script: impl IntoIterator<Item = ActivityState>) -> Self {
        self.activity_script.extend(script);
        self
    }

    pub fn failing_window_creation(mut self) -> Self {
        self.fail_window_creation = true;
        self
    }

    /// Run `hook` inside the event loop.
    pub fn on_exec(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_exec = Some(Box::new(hook));
        self
    }

    pub fn has_activity_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl HostEnvironment for HeadlessHost {
    type Window = HeadlessWindow;

    fn create_main_window(
        &mut self,
        spec: &WindowSpec,
        format: SurfaceFormat,
        sharing: ContextSharing,
    ) -> anyhow::Result<HeadlessWindow> {
        if self.fail_window_creation {
            anyhow::bail!("no display available");
        }
        let window = HeadlessWindow {
            id: self.windows.len(),
            spec: spec.clone(),
            format,
            sharing,
        };
        self.windows.push(window.clone());
        Ok(window)
    }

    fn show_window(&mut self, window: &HeadlessWindow) {
        self.shown.push(window.id);
    }

    fn connect_activity_changed(&mut self, handler: ActivityHandler) {
        self.handler = Some(handler);
    }

    fn exec(&mut self) -> i32 {
        self.exec_count += 1;
        if let Some(handler) = self.handler.as_mut() {
            for state in self.activity_script.drain(..) {
                handler(state);
            }
        }
        if let Some(hook) = self.on_exec.as_mut() {
            hook();
        }
        self.exit_code
    }
}

// ============================================================================
// Global state
// ============================================================================

static SURFACE_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that apply the process-wide surface format.
pub fn surface_guard() -> MutexGuard<'static, ()> {
    SURFACE_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
