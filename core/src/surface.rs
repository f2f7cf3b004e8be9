//! Default rendering surface format
//!
//! The surface format must be applied before the host environment and any
//! window exist. Every window snapshots the default at creation time, so
//! re-applying a format later only affects windows created afterwards.
//! There is no way to unset the default.
//!
//! Values are not validated here; an unsupported version or profile is
//! reported by the windowing layer when it creates the surface.

use std::sync::RwLock;

/// Rendering context profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceProfile {
    #[default]
    NoProfile,
    Core,
    Compatibility,
}

/// Buffering behavior of the swap chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapBehavior {
    /// Let the platform decide
    #[default]
    Default,
    SingleBuffer,
    DoubleBuffer,
    TripleBuffer,
}

/// Rendering context requirements for every surface created afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFormat {
    /// API version as (major, minor)
    pub version: (u8, u8),
    pub profile: SurfaceProfile,
    /// Frames between buffer swaps; 0 disables vsync
    pub swap_interval: u32,
    pub swap_behavior: SwapBehavior,
}

impl Default for SurfaceFormat {
    fn default() -> Self {
        Self {
            version: (2, 0),
            profile: SurfaceProfile::NoProfile,
            swap_interval: 1,
            swap_behavior: SwapBehavior::Default,
        }
    }
}

impl SurfaceFormat {
    /// Core-profile context of the given version with default buffering.
    pub fn opengl_core(major: u8, minor: u8) -> Self {
        Self {
            version: (major, minor),
            profile: SurfaceProfile::Core,
            ..Default::default()
        }
    }

    pub fn with_swap_interval(mut self, swap_interval: u32) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    pub fn with_swap_behavior(mut self, swap_behavior: SwapBehavior) -> Self {
        self.swap_behavior = swap_behavior;
        self
    }

    /// Whether presentation waits for vertical blank.
    pub fn vsync(&self) -> bool {
        self.swap_interval > 0
    }

    /// Make this the default for every surface created from now on.
    pub fn apply_default(self) {
        let mut current = DEFAULT_FORMAT.write().unwrap_or_else(|e| e.into_inner());
        tracing::debug!("Default surface format set to {:?}", self);
        *current = Some(self);
    }
}

/// Host-level context attributes applied alongside the surface format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSharing {
    /// Share resources between all rendering contexts
    pub share_contexts: bool,
    /// Check that a context is only made current on its creating thread
    pub check_thread_affinity: bool,
}

impl Default for ContextSharing {
    fn default() -> Self {
        Self {
            share_contexts: false,
            check_thread_affinity: true,
        }
    }
}

impl ContextSharing {
    /// Shared contexts usable from the render thread, as the emulator needs.
    pub fn shared_across_threads() -> Self {
        Self {
            share_contexts: true,
            check_thread_affinity: false,
        }
    }

    /// Make these the process-wide context attributes.
    pub fn apply(self) {
        let mut current = CONTEXT_SHARING.write().unwrap_or_else(|e| e.into_inner());
        *current = self;
    }
}

static DEFAULT_FORMAT: RwLock<Option<SurfaceFormat>> = RwLock::new(None);
static CONTEXT_SHARING: RwLock<ContextSharing> = RwLock::new(ContextSharing {
    share_contexts: false,
    check_thread_affinity: true,
});

/// The current default surface format, if one was applied.
pub fn default_format() -> Option<SurfaceFormat> {
    *DEFAULT_FORMAT.read().unwrap_or_else(|e| e.into_inner())
}

/// The current default, or the built-in format if none was applied.
pub fn effective_format() -> SurfaceFormat {
    default_format().unwrap_or_default()
}

/// The process-wide context attributes.
pub fn context_sharing() -> ContextSharing {
    *CONTEXT_SHARING.read().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opengl_core_builder() {
        let format = SurfaceFormat::opengl_core(3, 3).with_swap_interval(0);
        assert_eq!(format.version, (3, 3));
        assert_eq!(format.profile, SurfaceProfile::Core);
        assert_eq!(format.swap_behavior, SwapBehavior::Default);
        assert!(!format.vsync());
    }

    #[test]
    fn test_default_format_is_vsynced() {
        let format = SurfaceFormat::default();
        assert!(format.vsync());
        assert_eq!(format.profile, SurfaceProfile::NoProfile);
    }

    #[test]
    fn test_shared_context_attributes() {
        let sharing = ContextSharing::shared_across_threads();
        assert!(sharing.share_contexts);
        assert!(!sharing.check_thread_affinity);
        assert_eq!(ContextSharing::default(), ContextSharing {
            share_contexts: false,
            check_thread_affinity: true,
        });
    }

    // Process-wide default snapshot semantics are covered by the lifecycle
    // tests, which own the global surface state for the test binary.
}
