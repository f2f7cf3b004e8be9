//! Ferrite - desktop frontend
//!
//! # Usage
//!
//! ```bash
//! ferrite
//! ferrite --fullscreen
//! ferrite --camera image --camera-image ~/Pictures/face.png
//! ferrite --config ./ferrite.toml
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use ferrite_core::config::{self, Config};

/// Ask hybrid-graphics drivers for the discrete GPU.
#[cfg(windows)]
#[allow(non_upper_case_globals)]
#[unsafe(no_mangle)]
#[used]
pub static NvOptimusEnablement: u32 = 1;

#[cfg(windows)]
#[allow(non_upper_case_globals)]
#[unsafe(no_mangle)]
#[used]
pub static AmdPowerXpressRequestHighPerformance: u32 = 1;

#[derive(Parser)]
#[command(name = "ferrite")]
#[command(author, version, about = "Ferrite - handheld console emulator frontend")]
struct Args {
    /// Read settings from this file instead of the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in fullscreen mode
    #[arg(long, short = 'f')]
    fullscreen: bool,

    /// Camera backend key (image, blank)
    #[arg(long)]
    camera: Option<String>,

    /// Picture served by the still-image camera
    #[arg(long)]
    camera_image: Option<PathBuf>,
}

impl Args {
    fn load_config(&self) -> Config {
        let mut config = match &self.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        };
        if self.fullscreen {
            config.video.fullscreen = true;
        }
        if let Some(camera) = &self.camera {
            config.camera.backend = camera.clone();
        }
        if let Some(image) = &self.camera_image {
            config.camera.image_path = Some(image.clone());
        }
        config
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.load_config();

    let code = ferrite_frontend::app::run(config)?;
    if code != 0 {
        tracing::warn!("Exiting with code {}", code);
    }
    std::process::exit(code);
}
