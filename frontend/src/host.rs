//! winit host environment
//!
//! winit 0.30 only creates windows from inside a running event loop, so
//! [`WinitHost::create_main_window`] returns a [`MainWindow`] handle that is
//! realized on the first `resumed` callback. The handle already carries the
//! window spec and the surface snapshot, and providers can clone it during
//! registration.
//!
//! The snapshot decides how the event loop paces frames ([`Presentation`])
//! and whether the native window may be used from other threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};

use ferrite_core::lifecycle::{ActivityHandler, ActivityState, HostEnvironment, WindowSpec};
use ferrite_core::surface::{ContextSharing, SurfaceFormat, SwapBehavior};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use crate::app::AppError;

/// Frame pacing of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentMode {
    /// Wait for vertical blank
    Fifo,
    /// Never block; newer frames replace queued ones
    Mailbox,
    /// Present as soon as a frame is ready
    Immediate,
}

/// Presentation settings derived from the surface format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub mode: PresentMode,
    /// Frames the renderer may queue ahead of the display
    pub max_frame_latency: u32,
}

impl Presentation {
    pub fn from_format(format: &SurfaceFormat) -> Self {
        let max_frame_latency = match format.swap_behavior {
            SwapBehavior::SingleBuffer => 1,
            SwapBehavior::Default | SwapBehavior::DoubleBuffer => 2,
            SwapBehavior::TripleBuffer => 3,
        };
        let mode = match (format.vsync(), format.swap_behavior) {
            (true, _) => PresentMode::Fifo,
            (false, SwapBehavior::TripleBuffer) => PresentMode::Mailbox,
            (false, _) => PresentMode::Immediate,
        };
        Self {
            mode,
            max_frame_latency,
        }
    }

    /// Whether the loop redraws continuously instead of waiting for events.
    pub fn is_continuous(&self) -> bool {
        self.mode != PresentMode::Fifo
    }

    fn control_flow(&self) -> ControlFlow {
        if self.is_continuous() {
            ControlFlow::Poll
        } else {
            ControlFlow::Wait
        }
    }
}

struct MainWindowInner {
    spec: WindowSpec,
    format: SurfaceFormat,
    sharing: ContextSharing,
    presentation: Presentation,
    visible: AtomicBool,
    native: OnceLock<Arc<Window>>,
    /// Thread that created the native window
    owner: OnceLock<ThreadId>,
}

/// Shared handle to the application's main window.
#[derive(Clone)]
pub struct MainWindow {
    inner: Arc<MainWindowInner>,
}

impl MainWindow {
    pub(crate) fn new(spec: WindowSpec, format: SurfaceFormat, sharing: ContextSharing) -> Self {
        Self {
            inner: Arc::new(MainWindowInner {
                spec,
                format,
                sharing,
                presentation: Presentation::from_format(&format),
                visible: AtomicBool::new(false),
                native: OnceLock::new(),
                owner: OnceLock::new(),
            }),
        }
    }

    pub fn spec(&self) -> &WindowSpec {
        &self.inner.spec
    }

    /// Surface format in effect when the window was created.
    pub fn format(&self) -> SurfaceFormat {
        self.inner.format
    }

    pub fn sharing(&self) -> ContextSharing {
        self.inner.sharing
    }

    pub fn presentation(&self) -> Presentation {
        self.inner.presentation
    }

    /// The native window, once the event loop has created it.
    ///
    /// With thread-affinity checks enabled, other threads get `None`.
    pub fn native(&self) -> Option<Arc<Window>> {
        if !self.usable_on_current_thread() {
            tracing::warn!("Main window used off the thread that created it");
            return None;
        }
        self.inner.native.get().cloned()
    }

    fn usable_on_current_thread(&self) -> bool {
        !self.inner.sharing.check_thread_affinity
            || self
                .inner
                .owner
                .get()
                .is_none_or(|owner| *owner == thread::current().id())
    }

    pub fn is_visible(&self) -> bool {
        self.inner.visible.load(Ordering::Acquire)
    }

    fn show(&self) {
        self.inner.visible.store(true, Ordering::Release);
        if let Some(window) = self.inner.native.get() {
            window.set_visible(true);
        }
    }

    /// Change the title, or restore the configured one with `None`.
    pub fn set_title(&self, title: Option<&str>) {
        if let Some(window) = self.native() {
            window.set_title(title.unwrap_or(&self.inner.spec.title));
        }
    }

    fn attributes(&self) -> winit::window::WindowAttributes {
        let spec = &self.inner.spec;
        let mut attributes = Window::default_attributes()
            .with_title(spec.title.clone())
            .with_inner_size(LogicalSize::new(spec.width, spec.height))
            .with_visible(self.is_visible());
        if spec.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        attributes
    }

    fn realize(&self, event_loop: &ActiveEventLoop) -> Result<(), winit::error::OsError> {
        if self.inner.native.get().is_some() {
            return Ok(());
        }
        let window = Arc::new(event_loop.create_window(self.attributes())?);
        let format = &self.inner.format;
        tracing::info!(
            "Main window realized (GL {}.{} {:?}, {:?} present, {} frame(s) in flight)",
            format.version.0,
            format.version.1,
            format.profile,
            self.inner.presentation.mode,
            self.inner.presentation.max_frame_latency
        );
        let _ = self.inner.owner.set(thread::current().id());
        let _ = self.inner.native.set(window);
        Ok(())
    }

    fn id(&self) -> Option<WindowId> {
        self.inner.native.get().map(|window| window.id())
    }
}

/// Forwards activity changes, dropping repeats of the current state.
pub(crate) struct ActivityTracker {
    current: ActivityState,
    handler: Option<ActivityHandler>,
}

impl ActivityTracker {
    pub(crate) fn new(handler: Option<ActivityHandler>) -> Self {
        Self {
            current: ActivityState::Active,
            handler,
        }
    }

    pub(crate) fn update(&mut self, state: ActivityState) {
        if state == self.current {
            return;
        }
        self.current = state;
        if let Some(handler) = self.handler.as_mut() {
            handler(state);
        }
    }
}

/// Activity state for a window focus change.
pub(crate) fn activity_for_focus(focused: bool) -> ActivityState {
    if focused {
        ActivityState::Active
    } else {
        ActivityState::Inactive
    }
}

/// Activity state after the window became hidden or visible again.
pub(crate) fn activity_for_occlusion(occluded: bool, focused: bool) -> ActivityState {
    if occluded {
        ActivityState::Suspended
    } else {
        activity_for_focus(focused)
    }
}

struct HostHandler {
    window: Option<MainWindow>,
    activity: ActivityTracker,
    exit_code: i32,
}

impl ApplicationHandler for HostHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            event_loop.set_control_flow(window.presentation().control_flow());
            if let Err(e) = window.realize(event_loop) {
                tracing::error!("Failed to create window: {}", e);
                self.exit_code = 1;
                event_loop.exit();
                return;
            }
        }
        self.activity.update(ActivityState::Active);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window
            && window.presentation().is_continuous()
            && let Some(native) = window.native()
        {
            native.request_redraw();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.activity.update(ActivityState::Suspended);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let is_main = self
            .window
            .as_ref()
            .and_then(MainWindow::id)
            .is_some_and(|id| id == window_id);
        if !is_main {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::Focused(focused) => {
                self.activity.update(activity_for_focus(focused));
            }
            WindowEvent::Occluded(occluded) => {
                let focused = self
                    .window
                    .as_ref()
                    .and_then(MainWindow::native)
                    .is_some_and(|native| native.has_focus());
                self.activity.update(activity_for_occlusion(occluded, focused));
            }
            _ => {}
        }
    }
}

/// Host environment backed by a winit event loop.
pub struct WinitHost {
    event_loop: Option<EventLoop<()>>,
    window: Option<MainWindow>,
    activity: Option<ActivityHandler>,
}

impl WinitHost {
    pub fn new() -> Result<Self, AppError> {
        let event_loop = EventLoop::new().map_err(|e| AppError::EventLoop(e.to_string()))?;
        Ok(Self {
            event_loop: Some(event_loop),
            window: None,
            activity: None,
        })
    }
}

impl HostEnvironment for WinitHost {
    type Window = MainWindow;

    fn create_main_window(
        &mut self,
        spec: &WindowSpec,
        format: SurfaceFormat,
        sharing: ContextSharing,
    ) -> anyhow::Result<MainWindow> {
        if self.window.is_some() {
            anyhow::bail!("main window already exists");
        }
        let window = MainWindow::new(spec.clone(), format, sharing);
        self.window = Some(window.clone());
        Ok(window)
    }

    fn show_window(&mut self, window: &MainWindow) {
        window.show();
    }

    fn connect_activity_changed(&mut self, handler: ActivityHandler) {
        self.activity = Some(handler);
    }

    fn exec(&mut self) -> i32 {
        let Some(event_loop) = self.event_loop.take() else {
            tracing::error!("Event loop already consumed");
            return 1;
        };
        let mut handler = HostHandler {
            window: self.window.clone(),
            activity: ActivityTracker::new(self.activity.take()),
            exit_code: 0,
        };
        match event_loop.run_app(&mut handler) {
            Ok(()) => handler.exit_code,
            Err(e) => {
                tracing::error!("{}", AppError::EventLoop(e.to_string()));
                1
            }
        }
    }
}
