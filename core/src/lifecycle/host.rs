//! Windowing/host environment boundary
//!
//! The lifecycle controller drives the host through this trait. The
//! frontend implements it over winit; tests use a headless host.

use crate::surface::{ContextSharing, SurfaceFormat};

/// Foreground/background state of the application as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityState {
    /// Focused and in the foreground
    Active,
    /// Visible but not focused
    Inactive,
    /// Hidden, minimized or suspended by the OS
    Suspended,
}

impl ActivityState {
    /// Whether the application has focus.
    pub fn is_active(&self) -> bool {
        matches!(self, ActivityState::Active)
    }
}

/// Callback invoked on the control thread when the activity state changes.
pub type ActivityHandler = Box<dyn FnMut(ActivityState)>;

/// Description of the main window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            title: "Ferrite".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Host application object owning the native event loop.
pub trait HostEnvironment {
    /// Handle to the main window, cloned into providers that need a parent.
    type Window;

    /// Construct (but do not show) the main window.
    ///
    /// `format` and `sharing` are the process-wide defaults at the time of
    /// the call; the window keeps them for its whole lifetime.
    fn create_main_window(
        &mut self,
        spec: &WindowSpec,
        format: SurfaceFormat,
        sharing: ContextSharing,
    ) -> anyhow::Result<Self::Window>;

    /// Make the main window visible.
    fn show_window(&mut self, window: &Self::Window);

    /// Subscribe to activity-state changes.
    fn connect_activity_changed(&mut self, handler: ActivityHandler);

    /// Run the event loop until the application quits and return its exit code.
    fn exec(&mut self) -> i32;
}
