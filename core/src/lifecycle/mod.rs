//! Application lifecycle
//!
//! Drives process bootstrap and shutdown in a fixed order:
//!
//! 1. [`LifecycleController::configure`] applies the default surface format
//!    and context attributes before any host or window exists.
//! 2. [`LifecycleController::create_window`] pins the numeric locale and
//!    builds the main window (hidden).
//! 3. [`LifecycleController::register_providers`] installs every capability
//!    provider into the core system, then closes the registration barrier.
//! 4. [`LifecycleController::run`] powers the system on, shows the window,
//!    forwards activity changes to the system, and runs the host event loop. After the loop
//!    returns it waits for every detached task before shutting the system
//!    down and returning the loop's exit code.
//!
//! Calling a step out of order returns [`LifecycleError::InvalidTransition`]
//! and leaves the controller untouched.

mod error;
mod host;
mod state;

use std::sync::Arc;

pub use error::LifecycleError;
pub use host::{ActivityHandler, ActivityState, HostEnvironment, WindowSpec};
pub use state::LifecycleState;

use crate::platform;
use crate::surface::{self, ContextSharing, SurfaceFormat};
use crate::system::System;
use crate::tasks::DetachedTasks;

/// Everything a provider may capture while being registered.
pub struct RegistrationContext<'a, W> {
    /// Main window, for providers that present modal UI
    pub window: &'a W,
    pub system: &'a Arc<System>,
    /// Tracker for background work started by providers
    pub tasks: &'a DetachedTasks,
}

/// Owns the host environment and main window for the life of the process.
pub struct LifecycleController<H: HostEnvironment> {
    state: LifecycleState,
    host: Option<H>,
    window: Option<H::Window>,
    system: Arc<System>,
    tasks: DetachedTasks,
}

impl<H: HostEnvironment> LifecycleController<H> {
    pub fn new(system: Arc<System>, tasks: DetachedTasks) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            host: None,
            window: None,
            system,
            tasks,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn window(&self) -> Option<&H::Window> {
        self.window.as_ref()
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn system(&self) -> &Arc<System> {
        &self.system
    }

    pub fn tasks(&self) -> &DetachedTasks {
        &self.tasks
    }

    fn expect_next(&self, to: LifecycleState) -> Result<(), LifecycleError> {
        if self.state.can_transition_to(to) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                from: self.state,
                to,
            })
        }
    }

    fn advance(&mut self, to: LifecycleState) {
        tracing::debug!("Lifecycle: {} -> {}", self.state, to);
        self.state = to;
    }

    /// Apply process-wide surface and context settings.
    pub fn configure(
        &mut self,
        format: SurfaceFormat,
        sharing: ContextSharing,
    ) -> Result<(), LifecycleError> {
        self.expect_next(LifecycleState::Configured)?;

        format.apply_default();
        sharing.apply();
        platform::relocate_to_bundle_parent();

        self.advance(LifecycleState::Configured);
        Ok(())
    }

    /// Take ownership of the host and construct the main window.
    ///
    /// The window is not shown until [`run`](Self::run).
    pub fn create_window(&mut self, mut host: H, spec: &WindowSpec) -> Result<(), LifecycleError> {
        self.expect_next(LifecycleState::WindowCreated)?;

        platform::pin_numeric_locale();

        let format = surface::effective_format();
        let sharing = surface::context_sharing();
        let window = host
            .create_main_window(spec, format, sharing)
            .map_err(LifecycleError::WindowCreation)?;

        tracing::info!(
            "Created main window '{}' ({}x{}, GL {}.{} {:?}, shared contexts: {})",
            spec.title,
            spec.width,
            spec.height,
            format.version.0,
            format.version.1,
            format.profile,
            sharing.share_contexts
        );

        self.host = Some(host);
        self.window = Some(window);
        self.advance(LifecycleState::WindowCreated);
        Ok(())
    }

    /// Register every capability provider, then close the registration
    /// barrier on the system.
    ///
    /// If `register` fails the controller stays in `WindowCreated` and the
    /// window is never shown.
    pub fn register_providers<F>(&mut self, register: F) -> Result<(), LifecycleError>
    where
        F: FnOnce(RegistrationContext<'_, H::Window>) -> anyhow::Result<()>,
    {
        self.expect_next(LifecycleState::ProvidersRegistered)?;
        let Some(window) = self.window.as_ref() else {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: LifecycleState::ProvidersRegistered,
            });
        };

        register(RegistrationContext {
            window,
            system: &self.system,
            tasks: &self.tasks,
        })
        .map_err(LifecycleError::Registration)?;

        self.system.finish_registration();
        self.advance(LifecycleState::ProvidersRegistered);
        Ok(())
    }

    /// Power on, show the window, run the event loop, then drain and shut
    /// down.
    ///
    /// If the system refuses to power on, the window stays hidden and the
    /// controller stays in `ProvidersRegistered`. Returns the event loop's
    /// exit code unchanged.
    pub fn run(&mut self) -> Result<i32, LifecycleError> {
        self.expect_next(LifecycleState::Running)?;
        let (Some(host), Some(window)) = (self.host.as_mut(), self.window.as_ref()) else {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: LifecycleState::Running,
            });
        };

        // A system that cannot start must fail before anything is shown
        self.system.power_on()?;
        host.show_window(window);
        let system = Arc::clone(&self.system);
        host.connect_activity_changed(Box::new(move |state| {
            system.notify_activity_changed(state);
        }));

        self.advance(LifecycleState::Running);
        tracing::info!("Entering event loop");
        let code = self.exec_host();
        tracing::info!("Event loop exited with code {}", code);

        self.advance(LifecycleState::Draining);
        self.tasks.wait_for_all_tasks();

        self.system.shutdown();
        self.advance(LifecycleState::Terminated);
        Ok(code)
    }

    fn exec_host(&mut self) -> i32 {
        match self.host.as_mut() {
            Some(host) => host.exec(),
            None => 1,
        }
    }
}
