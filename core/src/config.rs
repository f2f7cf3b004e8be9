//! Configuration management (config.toml)
//!
//! Settings are stored in TOML format in the platform-specific config
//! directory. Every field has a default, so partial or missing files load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::frontend::camera::Flip;

/// Application identity used to locate per-user directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppIdentity {
    pub qualifier: &'static str,
    pub organization: &'static str,
    pub application: &'static str,
}

impl AppIdentity {
    pub const FERRITE: AppIdentity = AppIdentity {
        qualifier: "org",
        organization: "Ferrite Team",
        application: "Ferrite",
    };

    fn project_dirs(&self) -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from(self.qualifier, self.organization, self.application)
    }
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self::FERRITE
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Main window and surface settings
    #[serde(default)]
    pub video: VideoConfig,
    /// Emulated camera settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Which applet providers the system adopts
    #[serde(default)]
    pub applets: AppletConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Video and window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Start in fullscreen (default: false)
    #[serde(default)]
    pub fullscreen: bool,
    /// Initial window width (default: 1280)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Initial window height (default: 720)
    #[serde(default = "default_height")]
    pub height: u32,
    /// Frames between swaps, 0 disables vsync (default: 0)
    #[serde(default)]
    pub swap_interval: u32,
}

/// Camera configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Registered camera provider key (default: "image")
    #[serde(default = "default_camera_backend")]
    pub backend: String,
    /// Picture served by the still-image camera
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    #[serde(default)]
    pub flip: Flip,
}

/// Applet provider selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppletConfig {
    /// Mii selector provider key (default: "dialog")
    #[serde(default = "default_mii_selector")]
    pub mii_selector: String,
    /// Software keyboard provider key (default: "console")
    #[serde(default = "default_software_keyboard")]
    pub software_keyboard: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Pause emulation while the window is unfocused (default: true)
    #[serde(default = "default_true")]
    pub pause_when_in_background: bool,
}

fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_camera_backend() -> String {
    "image".to_string()
}
fn default_mii_selector() -> String {
    "dialog".to_string()
}
fn default_software_keyboard() -> String {
    "console".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            width: default_width(),
            height: default_height(),
            swap_interval: 0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            backend: default_camera_backend(),
            image_path: None,
            flip: Flip::None,
        }
    }
}

impl Default for AppletConfig {
    fn default() -> Self {
        Self {
            mii_selector: default_mii_selector(),
            software_keyboard: default_software_keyboard(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            pause_when_in_background: default_true(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/Ferrite`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    AppIdentity::default()
        .project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the platform-specific data directory.
pub fn data_dir() -> Option<PathBuf> {
    AppIdentity::default()
        .project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path of `config.toml` in the configuration directory.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the configuration from the platform's configuration directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    config_path().map(|path| load_from(&path)).unwrap_or_default()
}

/// Loads the configuration from an explicit path, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("No config at {}: {}", path.display(), e);
            return Config::default();
        }
    };
    toml::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unparsable config {}: {}", path.display(), e);
        Config::default()
    })
}

/// Saves the configuration to the platform's configuration directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save(config: &Config) -> std::io::Result<()> {
    match config_path() {
        Some(path) => save_to(config, &path),
        None => Ok(()),
    }
}

/// Saves the configuration to an explicit path, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.video.fullscreen);
        assert_eq!((config.video.width, config.video.height), (1280, 720));
        assert_eq!(config.video.swap_interval, 0);
        assert_eq!(config.camera.backend, "image");
        assert_eq!(config.applets.mii_selector, "dialog");
        assert_eq!(config.applets.software_keyboard, "console");
        assert!(config.ui.pause_when_in_background);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_partial_camera() {
        let toml_str = r#"
[camera]
image_path = "/tmp/face.png"
flip = "horizontal"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.camera.backend, "image");
        assert_eq!(config.camera.image_path, Some(PathBuf::from("/tmp/face.png")));
        assert_eq!(config.camera.flip, Flip::Horizontal);
        assert_eq!(config.video, VideoConfig::default());
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.video.fullscreen = true;
        config.applets.software_keyboard = "default".to_string();
        config.ui.pause_when_in_background = false;

        save_to(&config, &path).unwrap();
        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_load_from_missing_or_invalid_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(load_from(&missing), Config::default());

        let invalid = dir.path().join("invalid.toml");
        std::fs::write(&invalid, "[video\nfullscreen = ").unwrap();
        assert_eq!(load_from(&invalid), Config::default());
    }

    #[test]
    fn test_app_identity() {
        let identity = AppIdentity::default();
        assert_eq!(identity.qualifier, "org");
        assert_eq!(identity.organization, "Ferrite Team");
        assert_eq!(identity.application, "Ferrite");
    }
}
