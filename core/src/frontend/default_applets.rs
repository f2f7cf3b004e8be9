//! Fallback applet registration

use std::sync::Arc;

use crate::system::System;

use super::applets::{DefaultKeyboard, DefaultMiiSelector};

/// Register the built-in applets with the core system.
///
/// Frontends call this first and then override individual applets with
/// their own UI, so every applet kind has a handler even when the frontend
/// only implements some of them.
pub fn register_default_applets(system: &System) {
    system.register_mii_selector(Arc::new(DefaultMiiSelector));
    system.register_software_keyboard(Arc::new(DefaultKeyboard));
}
