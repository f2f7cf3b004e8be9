//! Process-level platform fix-ups applied during bootstrap

use std::path::{Path, PathBuf};

/// Directory containing the `.app` bundle that holds `exe`, if any.
///
/// For `/Applications/Ferrite.app/Contents/MacOS/ferrite` this is
/// `/Applications`.
pub fn bundle_parent_dir(exe: &Path) -> Option<PathBuf> {
    exe.ancestors()
        .skip(1)
        .find(|dir| dir.extension().is_some_and(|ext| ext == "app"))
        .and_then(Path::parent)
        .map(Path::to_path_buf)
}

/// Make relative paths resolve next to the application bundle.
///
/// Apps launched from Finder start with `/` as their working directory.
/// No-op outside macOS or when not running from a bundle.
pub fn relocate_to_bundle_parent() {
    #[cfg(target_os = "macos")]
    {
        let exe = match std::env::current_exe() {
            Ok(exe) => exe,
            Err(e) => {
                tracing::warn!("Could not resolve executable path: {}", e);
                return;
            }
        };
        if let Some(dir) = bundle_parent_dir(&exe) {
            match std::env::set_current_dir(&dir) {
                Ok(()) => tracing::debug!("Working directory set to {}", dir.display()),
                Err(e) => tracing::warn!("Failed to change directory to {}: {}", dir.display(), e),
            }
        }
    }
}

/// Force `LC_ALL=C` so float parsing and formatting in native libraries
/// (GL drivers, shader compilers) never see a decimal comma.
///
/// Safe to call more than once.
pub fn pin_numeric_locale() {
    #[cfg(unix)]
    {
        // SAFETY: called on the control thread during bootstrap, before any
        // other thread that could read the locale is started.
        let result = unsafe { libc::setlocale(libc::LC_ALL, c"C".as_ptr()) };
        if result.is_null() {
            tracing::warn!("setlocale(LC_ALL, \"C\") failed");
        }
    }
}
