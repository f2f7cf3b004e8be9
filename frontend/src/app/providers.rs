//! Frontend capability providers
//!
//! Every provider the frontend ships is registered under its key in the
//! system's registries, then the keys named in the config pick which one
//! the core system adopts. The registries outlive bootstrap, so the core can
//! still resolve other keys later.

use std::sync::Arc;

use ferrite_core::config::Config;
use ferrite_core::frontend::applets::mii_selector::DefaultMiiSelector;
use ferrite_core::frontend::applets::swkbd::DefaultKeyboard;
use ferrite_core::frontend::camera::{BLANK_CAMERA, BlankCameraFactory};
use ferrite_core::registry::{ProviderRegistry, Registries};
use ferrite_core::{DetachedTasks, System};

use super::AppError;
use crate::applets::{
    CONSOLE_KEYBOARD, ConsoleKeyboard, DEFAULT_APPLET, DIALOG_MII_SELECTOR, DialogMiiSelector,
};
use crate::camera::{IMAGE_CAMERA, StillImageCameraFactory};
use crate::host::MainWindow;
use crate::image_interface::{PNG_IMAGE_INTERFACE, PngImageInterface};

/// Register every provider known to the desktop frontend.
pub fn register_all(
    registries: &mut Registries,
    window: &MainWindow,
    tasks: &DetachedTasks,
    config: &Config,
) {
    registries.cameras.register(
        IMAGE_CAMERA,
        Box::new(StillImageCameraFactory::new(
            config.camera.image_path.clone(),
            config.camera.flip,
            tasks.clone(),
        )),
    );
    registries
        .cameras
        .register(BLANK_CAMERA, Box::new(BlankCameraFactory));

    registries.mii_selectors.register(
        DIALOG_MII_SELECTOR,
        Box::new(DialogMiiSelector::new(window.clone())),
    );
    registries
        .mii_selectors
        .register(DEFAULT_APPLET, Box::new(DefaultMiiSelector));

    registries.software_keyboards.register(
        CONSOLE_KEYBOARD,
        Box::new(ConsoleKeyboard::new(window.clone())),
    );
    registries
        .software_keyboards
        .register(DEFAULT_APPLET, Box::new(DefaultKeyboard));

    registries
        .image_interfaces
        .register(PNG_IMAGE_INTERFACE, Box::new(PngImageInterface));
}

/// Hand the configured providers to the core system.
///
/// Applet keys that are not registered fall back to the built-in default
/// applets; an unknown camera falls back to the blank camera.
pub fn install(system: &System, config: &Config) -> Result<(), AppError> {
    let registries = system.registries();
    system.register_camera(select(
        &registries.cameras,
        &config.camera.backend,
        BLANK_CAMERA,
    )?);
    system.register_mii_selector(select(
        &registries.mii_selectors,
        &config.applets.mii_selector,
        DEFAULT_APPLET,
    )?);
    system.register_software_keyboard(select(
        &registries.software_keyboards,
        &config.applets.software_keyboard,
        DEFAULT_APPLET,
    )?);
    system.register_image_interface(select(
        &registries.image_interfaces,
        PNG_IMAGE_INTERFACE,
        PNG_IMAGE_INTERFACE,
    )?);
    Ok(())
}

/// Look up `requested`, falling back to `fallback` with a warning.
fn select<P: ?Sized>(
    registry: &ProviderRegistry<P>,
    requested: &str,
    fallback: &str,
) -> Result<Arc<P>, AppError> {
    match registry.lookup(requested) {
        Ok(provider) => {
            tracing::debug!("Using {} provider '{}'", registry.kind(), requested);
            Ok(provider)
        }
        Err(e) => {
            tracing::warn!("{}, falling back to '{}'", e, fallback);
            registry.lookup(fallback).map_err(|_| AppError::NoProvider {
                kind: registry.kind(),
                requested: requested.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_core::CapabilityKind;
    use ferrite_core::frontend::applets::mii_selector::MiiSelectorConfig;
    use ferrite_core::frontend::applets::swkbd::KeyboardConfig;
    use ferrite_core::frontend::camera::{Flip, Resolution};
    use ferrite_core::lifecycle::WindowSpec;
    use ferrite_core::registry::CameraRegistry;
    use ferrite_core::surface::{ContextSharing, SurfaceFormat};

    fn registered_system(config: &Config) -> System {
        let window = MainWindow::new(
            WindowSpec::default(),
            SurfaceFormat::default(),
            ContextSharing::default(),
        );
        let system = System::new();
        register_all(
            &mut system.registries_mut(),
            &window,
            &DetachedTasks::new(),
            config,
        );
        system
    }

    #[test]
    fn test_every_kind_has_providers() {
        let system = registered_system(&Config::default());
        let registries = system.registries();
        assert_eq!(registries.keys(CapabilityKind::Camera), vec!["blank", "image"]);
        assert_eq!(
            registries.keys(CapabilityKind::MiiSelector),
            vec!["default", "dialog"]
        );
        assert_eq!(
            registries.keys(CapabilityKind::SoftwareKeyboard),
            vec!["console", "default"]
        );
        assert_eq!(registries.keys(CapabilityKind::ImageInterface), vec!["png"]);
    }

    #[test]
    fn test_install_fills_every_kind() {
        let mut config = Config::default();
        config.applets.mii_selector = DEFAULT_APPLET.to_string();
        config.applets.software_keyboard = DEFAULT_APPLET.to_string();

        let system = registered_system(&config);
        install(&system, &config).unwrap();

        assert_eq!(system.registered_kinds(), CapabilityKind::all().to_vec());
        let keyboard = system.software_keyboard().unwrap();
        assert_eq!(keyboard.execute(&KeyboardConfig::default()).text, "ferrite");
        let mii = system.mii_selector().unwrap();
        assert!(!mii.setup(&MiiSelectorConfig::default()).is_cancelled());
    }

    #[test]
    fn test_registries_outlive_install() {
        let mut config = Config::default();
        config.camera.backend = IMAGE_CAMERA.to_string();

        let system = registered_system(&config);
        install(&system, &config).unwrap();

        // The blank backend was not adopted but is still resolvable
        let mut camera = system.create_named_camera(BLANK_CAMERA, "", Flip::None);
        camera.set_resolution(Resolution {
            width: 2,
            height: 1,
        });
        assert_eq!(camera.receive_frame(), vec![0x8000, 0x8000]);
        assert!(system.registries().software_keyboards.contains(CONSOLE_KEYBOARD));
    }

    #[test]
    fn test_unknown_keys_fall_back() {
        let mut config = Config::default();
        config.camera.backend = "qt".to_string();
        config.applets.software_keyboard = "touch".to_string();

        let system = registered_system(&config);
        install(&system, &config).unwrap();

        let mut camera = system.create_camera("", Flip::None);
        camera.set_resolution(Resolution {
            width: 1,
            height: 1,
        });
        assert_eq!(camera.receive_frame(), vec![0x8000]);

        let keyboard = system.software_keyboard().unwrap();
        assert_eq!(keyboard.execute(&KeyboardConfig::default()).button, 1);
    }

    #[test]
    fn test_select_reports_missing_fallback() {
        let registry = CameraRegistry::cameras();
        let err = select(&registry, "image", BLANK_CAMERA).err().unwrap();
        assert!(matches!(
            err,
            AppError::NoProvider {
                kind: CapabilityKind::Camera,
                ..
            }
        ));
    }
}
