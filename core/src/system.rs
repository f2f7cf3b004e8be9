//! Core system handle
//!
//! One [`System`] exists per process. It is created at startup and passed
//! explicitly (as `Arc<System>`) to everything that needs it rather than
//! being looked up through a global.
//!
//! The system owns the process-wide [`Registries`] that map keys to every
//! known provider, and separately holds at most one adopted provider per
//! capability kind; adopting a new provider for a kind replaces the
//! previous one. Providers must all be
//! registered before [`System::finish_registration`], and the system refuses
//! to power on before that barrier.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::frontend::applets::mii_selector::MiiSelector;
use crate::frontend::applets::swkbd::SoftwareKeyboard;
use crate::frontend::camera::{self, BlankCamera, CameraFactory, CameraInterface, Flip};
use crate::frontend::image_interface::ImageInterface;
use crate::lifecycle::ActivityState;
use crate::registry::{CapabilityKind, Registries};

/// Errors reported by the core system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("capability provider registration has not finished")]
    RegistrationIncomplete,
    #[error("system is already powered on")]
    AlreadyPoweredOn,
}

/// Power state of the emulated system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    Running,
    Paused,
}

#[derive(Default)]
struct Providers {
    camera: Option<Arc<dyn CameraFactory>>,
    mii_selector: Option<Arc<dyn MiiSelector>>,
    software_keyboard: Option<Arc<dyn SoftwareKeyboard>>,
    image_interface: Option<Arc<dyn ImageInterface>>,
}

struct Status {
    registration_complete: bool,
    power: PowerState,
    activity: ActivityState,
    pause_in_background: bool,
    /// Paused because the app lost focus (resumes on refocus)
    auto_paused: bool,
}

/// The embedded execution engine's frontend-facing handle.
pub struct System {
    registries: RwLock<Registries>,
    providers: RwLock<Providers>,
    status: Mutex<Status>,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl System {
    pub fn new() -> Self {
        Self {
            registries: RwLock::new(Registries::new()),
            providers: RwLock::new(Providers::default()),
            status: Mutex::new(Status {
                registration_complete: false,
                power: PowerState::Off,
                activity: ActivityState::Active,
                pause_in_background: false,
                auto_paused: false,
            }),
        }
    }

    /// Every provider registered by key.
    pub fn registries(&self) -> RwLockReadGuard<'_, Registries> {
        self.registries.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn registries_mut(&self) -> RwLockWriteGuard<'_, Registries> {
        self.registries.write().unwrap_or_else(|e| e.into_inner())
    }

    fn providers(&self) -> RwLockReadGuard<'_, Providers> {
        self.providers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn providers_mut(&self) -> RwLockWriteGuard<'_, Providers> {
        self.providers.write().unwrap_or_else(|e| e.into_inner())
    }

    fn status(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(|e| {
            tracing::warn!("System status mutex poisoned; continuing");
            e.into_inner()
        })
    }

    fn log_registration(kind: CapabilityKind, replaced: bool) {
        if replaced {
            tracing::debug!("Replaced {} provider", kind);
        } else {
            tracing::debug!("Registered {} provider", kind);
        }
    }

    // =============================================================
    // Provider registration
    // =============================================================

    /// Set the camera factory used by the emulated camera service.
    pub fn register_camera(&self, factory: Arc<dyn CameraFactory>) {
        let replaced = self.providers_mut().camera.replace(factory).is_some();
        Self::log_registration(CapabilityKind::Camera, replaced);
    }

    /// Set the Mii selector applet handler.
    pub fn register_mii_selector(&self, applet: Arc<dyn MiiSelector>) {
        let replaced = self.providers_mut().mii_selector.replace(applet).is_some();
        Self::log_registration(CapabilityKind::MiiSelector, replaced);
    }

    /// Set the software keyboard applet handler.
    pub fn register_software_keyboard(&self, applet: Arc<dyn SoftwareKeyboard>) {
        let replaced = self.providers_mut().software_keyboard.replace(applet).is_some();
        Self::log_registration(CapabilityKind::SoftwareKeyboard, replaced);
    }

    /// Set the image decode/encode backend.
    pub fn register_image_interface(&self, image_interface: Arc<dyn ImageInterface>) {
        let replaced = self
            .providers_mut()
            .image_interface
            .replace(image_interface)
            .is_some();
        Self::log_registration(CapabilityKind::ImageInterface, replaced);
    }

    pub fn camera_factory(&self) -> Option<Arc<dyn CameraFactory>> {
        self.providers().camera.clone()
    }

    pub fn mii_selector(&self) -> Option<Arc<dyn MiiSelector>> {
        self.providers().mii_selector.clone()
    }

    pub fn software_keyboard(&self) -> Option<Arc<dyn SoftwareKeyboard>> {
        self.providers().software_keyboard.clone()
    }

    pub fn image_interface(&self) -> Option<Arc<dyn ImageInterface>> {
        self.providers().image_interface.clone()
    }

    /// Capability kinds that currently have a provider.
    pub fn registered_kinds(&self) -> Vec<CapabilityKind> {
        let providers = self.providers();
        CapabilityKind::all()
            .iter()
            .copied()
            .filter(|kind| match kind {
                CapabilityKind::Camera => providers.camera.is_some(),
                CapabilityKind::MiiSelector => providers.mii_selector.is_some(),
                CapabilityKind::SoftwareKeyboard => providers.software_keyboard.is_some(),
                CapabilityKind::ImageInterface => providers.image_interface.is_some(),
            })
            .collect()
    }

    /// Create a camera through the registered factory.
    ///
    /// Without a registered factory the camera service gets a blank camera.
    pub fn create_camera(&self, config: &str, flip: Flip) -> Box<dyn CameraInterface> {
        match self.camera_factory() {
            Some(factory) => factory.create(config, flip),
            None => {
                tracing::warn!("No camera provider registered, using blank camera");
                Box::new(BlankCamera::new())
            }
        }
    }

    /// Create a camera through the factory registered under `name`.
    ///
    /// Unknown names get a blank camera.
    pub fn create_named_camera(
        &self,
        name: &str,
        config: &str,
        flip: Flip,
    ) -> Box<dyn CameraInterface> {
        camera::create_camera(&self.registries().cameras, name, config, flip)
    }

    /// Create a preview camera through the factory registered under `name`.
    pub fn create_camera_preview(
        &self,
        name: &str,
        config: &str,
        width: u16,
        height: u16,
        flip: Flip,
    ) -> Box<dyn CameraInterface> {
        let registries = self.registries();
        camera::create_camera_preview(&registries.cameras, name, config, width, height, flip)
    }

    // =============================================================
    // Registration barrier and power
    // =============================================================

    /// Mark provider registration as complete.
    pub fn finish_registration(&self) {
        self.status().registration_complete = true;
        tracing::info!(
            "Capability providers registered: {:?}",
            self.registered_kinds()
        );
    }

    pub fn is_registration_complete(&self) -> bool {
        self.status().registration_complete
    }

    /// Start driving the emulated system.
    pub fn power_on(&self) -> Result<(), SystemError> {
        let mut status = self.status();
        if !status.registration_complete {
            return Err(SystemError::RegistrationIncomplete);
        }
        if status.power != PowerState::Off {
            return Err(SystemError::AlreadyPoweredOn);
        }
        status.power = PowerState::Running;
        status.auto_paused = false;
        tracing::info!("System powered on");
        Ok(())
    }

    /// Stop the emulated system. Safe to call when already off.
    pub fn shutdown(&self) {
        let mut status = self.status();
        if status.power != PowerState::Off {
            status.power = PowerState::Off;
            status.auto_paused = false;
            tracing::info!("System shut down");
        }
    }

    pub fn power_state(&self) -> PowerState {
        self.status().power
    }

    /// Pause automatically while the application is in the background.
    pub fn set_pause_in_background(&self, enabled: bool) {
        self.status().pause_in_background = enabled;
    }

    // =============================================================
    // Host notifications
    // =============================================================

    /// Host focus/activity transition.
    ///
    /// With pause-in-background enabled, losing focus pauses a running
    /// system and regaining focus resumes it, but only if the pause was
    /// caused by losing focus.
    pub fn notify_activity_changed(&self, state: ActivityState) {
        let mut status = self.status();
        if status.activity == state {
            return;
        }
        tracing::debug!("Application activity changed: {:?} -> {:?}", status.activity, state);
        status.activity = state;

        if !status.pause_in_background {
            return;
        }
        if !state.is_active() && status.power == PowerState::Running {
            status.power = PowerState::Paused;
            status.auto_paused = true;
            tracing::info!("Paused emulation while in background");
        } else if state.is_active() && status.auto_paused && status.power == PowerState::Paused {
            status.power = PowerState::Running;
            status.auto_paused = false;
            tracing::info!("Resumed emulation in foreground");
        }
    }

    pub fn activity_state(&self) -> ActivityState {
        self.status().activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::applets::mii_selector::{DefaultMiiSelector, MiiSelectorConfig};
    use crate::frontend::applets::swkbd::{DefaultKeyboard, KeyboardConfig};
    use crate::frontend::camera::Resolution;
    use crate::test_utils::{NullImageInterface, TaggedCameraFactory, TaggedMiiSelector};

    #[test]
    fn test_new_system_has_no_providers() {
        let system = System::new();
        assert!(system.registered_kinds().is_empty());
        assert!(system.camera_factory().is_none());
        assert!(system.mii_selector().is_none());
        assert!(system.software_keyboard().is_none());
        assert!(system.image_interface().is_none());
    }

    #[test]
    fn test_register_replaces_never_accumulates() {
        let system = System::new();
        system.register_mii_selector(Arc::new(TaggedMiiSelector(1)));
        system.register_mii_selector(Arc::new(TaggedMiiSelector(2)));

        let selected = system
            .mii_selector()
            .unwrap()
            .setup(&MiiSelectorConfig::default());
        assert_eq!(selected.selected_mii.mii_id, 2);
        assert_eq!(system.registered_kinds(), vec![CapabilityKind::MiiSelector]);
    }

    #[test]
    fn test_registered_kinds_covers_all_four() {
        let system = System::new();
        system.register_camera(Arc::new(TaggedCameraFactory(1)));
        system.register_mii_selector(Arc::new(DefaultMiiSelector));
        system.register_software_keyboard(Arc::new(DefaultKeyboard));
        system.register_image_interface(Arc::new(NullImageInterface));

        assert_eq!(system.registered_kinds(), CapabilityKind::all().to_vec());
        assert_eq!(
            system
                .software_keyboard()
                .unwrap()
                .execute(&KeyboardConfig::default())
                .text,
            "ferrite"
        );
    }

    #[test]
    fn test_provider_handle_is_shared() {
        let system = System::new();
        let factory: Arc<dyn CameraFactory> = Arc::new(TaggedCameraFactory(5));
        system.register_camera(Arc::clone(&factory));
        assert!(Arc::ptr_eq(&factory, &system.camera_factory().unwrap()));
    }

    #[test]
    fn test_create_camera_without_provider_is_blank() {
        let system = System::new();
        let mut camera = system.create_camera("", Flip::None);
        camera.set_resolution(Resolution {
            width: 1,
            height: 1,
        });
        assert_eq!(camera.receive_frame(), vec![0x8000]);

        system.register_camera(Arc::new(TaggedCameraFactory(9)));
        let mut camera = system.create_camera("", Flip::None);
        assert_eq!(camera.receive_frame(), vec![9]);
    }

    #[test]
    fn test_registered_factories_stay_resolvable_by_name() {
        let system = System::new();
        {
            let mut registries = system.registries_mut();
            registries
                .cameras
                .register("image", Box::new(TaggedCameraFactory(4)));
            registries
                .cameras
                .register("qt", Box::new(TaggedCameraFactory(6)));
        }
        system.register_camera(system.registries().cameras.lookup("image").unwrap());
        system.finish_registration();

        // Adoption and named lookup are independent
        assert_eq!(system.create_camera("", Flip::None).receive_frame(), vec![4]);
        assert_eq!(
            system.create_named_camera("qt", "", Flip::None).receive_frame(),
            vec![6]
        );
        assert_eq!(
            system
                .create_camera_preview("qt", "", 2, 2, Flip::None)
                .receive_frame(),
            vec![6]
        );

        let mut missing = system.create_camera_preview("webcam", "", 2, 1, Flip::None);
        assert_eq!(missing.receive_frame(), vec![0, 0]);
    }

    #[test]
    fn test_power_on_requires_registration_barrier() {
        let system = System::new();
        assert_eq!(system.power_on(), Err(SystemError::RegistrationIncomplete));
        assert_eq!(system.power_state(), PowerState::Off);

        system.finish_registration();
        assert!(system.is_registration_complete());
        assert_eq!(system.power_on(), Ok(()));
        assert_eq!(system.power_on(), Err(SystemError::AlreadyPoweredOn));

        system.shutdown();
        assert_eq!(system.power_state(), PowerState::Off);
    }

    #[test]
    fn test_focus_loss_ignored_without_pause_in_background() {
        let system = System::new();
        system.finish_registration();
        system.power_on().unwrap();

        system.notify_activity_changed(ActivityState::Inactive);
        assert_eq!(system.activity_state(), ActivityState::Inactive);
        assert_eq!(system.power_state(), PowerState::Running);
    }

    #[test]
    fn test_pause_in_background_round_trip() {
        let system = System::new();
        system.set_pause_in_background(true);
        system.finish_registration();
        system.power_on().unwrap();

        system.notify_activity_changed(ActivityState::Suspended);
        assert_eq!(system.power_state(), PowerState::Paused);

        system.notify_activity_changed(ActivityState::Active);
        assert_eq!(system.power_state(), PowerState::Running);
    }

    #[test]
    fn test_background_while_off_does_not_pause() {
        let system = System::new();
        system.set_pause_in_background(true);

        system.notify_activity_changed(ActivityState::Inactive);
        system.notify_activity_changed(ActivityState::Active);
        assert_eq!(system.power_state(), PowerState::Off);
    }
}
