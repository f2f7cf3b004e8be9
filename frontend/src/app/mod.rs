//! Frontend bootstrap
//!
//! Brings the process up in the order the core lifecycle requires:
//! surface format, main window, capability providers, event loop, and
//! finally the detached-task drain.

mod init;
pub mod providers;

use std::sync::Arc;

use ferrite_core::config::{Config, VideoConfig};
use ferrite_core::frontend::register_default_applets;
use ferrite_core::lifecycle::{LifecycleController, WindowSpec};
use ferrite_core::surface::{ContextSharing, SurfaceFormat};
use ferrite_core::{DetachedTasks, System};

pub use init::AppError;

use crate::host::WinitHost;

/// Rendering context the emulator's renderer needs.
pub fn surface_format(video: &VideoConfig) -> SurfaceFormat {
    SurfaceFormat::opengl_core(3, 3).with_swap_interval(video.swap_interval)
}

pub fn window_spec(video: &VideoConfig) -> WindowSpec {
    WindowSpec {
        title: format!("Ferrite {}", env!("CARGO_PKG_VERSION")),
        width: video.width,
        height: video.height,
        fullscreen: video.fullscreen,
    }
}

/// Run the frontend until the main window closes.
///
/// Returns the event loop's exit code once every detached task finished.
pub fn run(config: Config) -> anyhow::Result<i32> {
    let system = Arc::new(System::new());
    system.set_pause_in_background(config.ui.pause_when_in_background);

    let mut controller = LifecycleController::new(system, DetachedTasks::new());
    controller.configure(
        surface_format(&config.video),
        ContextSharing::shared_across_threads(),
    )?;

    let host = WinitHost::new()?;
    controller.create_window(host, &window_spec(&config.video))?;

    controller.register_providers(|ctx| {
        providers::register_all(
            &mut ctx.system.registries_mut(),
            ctx.window,
            ctx.tasks,
            &config,
        );
        register_default_applets(ctx.system);
        providers::install(ctx.system, &config)?;
        Ok(())
    })?;

    Ok(controller.run()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_core::surface::{SurfaceProfile, SwapBehavior};

    #[test]
    fn test_surface_format_is_gl33_core() {
        let format = surface_format(&VideoConfig::default());
        assert_eq!(format.version, (3, 3));
        assert_eq!(format.profile, SurfaceProfile::Core);
        assert_eq!(format.swap_interval, 0);
        assert_eq!(format.swap_behavior, SwapBehavior::Default);
    }

    #[test]
    fn test_window_spec_from_config() {
        let video = VideoConfig {
            fullscreen: true,
            width: 800,
            height: 600,
            ..Default::default()
        };
        let spec = window_spec(&video);
        assert!(spec.title.starts_with("Ferrite"));
        assert_eq!((spec.width, spec.height), (800, 600));
        assert!(spec.fullscreen);
    }
}
