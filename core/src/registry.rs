//! Capability provider registries
//!
//! Each capability kind (cameras, UI applets, image codecs) gets its own
//! registry mapping a short string key to a provider. Keys are only used at
//! the outermost configuration boundary: the frontend registers every
//! provider it knows about, resolves the configured key once, and hands the
//! resulting strongly-typed handle to the [`System`](crate::System).
//!
//! The registry never instantiates capabilities; it only stores and hands
//! out the factories/handlers it was given.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use thiserror::Error;

use crate::frontend::applets::mii_selector::MiiSelector;
use crate::frontend::applets::swkbd::SoftwareKeyboard;
use crate::frontend::camera::CameraFactory;
use crate::frontend::image_interface::ImageInterface;

/// Pluggable roles the core system delegates to frontend implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// Camera sources (still image, blank, ...)
    Camera,
    /// Mii selector applet
    MiiSelector,
    /// Software keyboard applet
    SoftwareKeyboard,
    /// Image decode/encode sink
    ImageInterface,
}

impl CapabilityKind {
    /// Stable lowercase identifier, used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Camera => "camera",
            CapabilityKind::MiiSelector => "mii_selector",
            CapabilityKind::SoftwareKeyboard => "software_keyboard",
            CapabilityKind::ImageInterface => "image_interface",
        }
    }

    /// All capability kinds.
    pub fn all() -> &'static [CapabilityKind] {
        &[
            CapabilityKind::Camera,
            CapabilityKind::MiiSelector,
            CapabilityKind::SoftwareKeyboard,
            CapabilityKind::ImageInterface,
        ]
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no {kind} provider registered under key '{key}'")]
    NotFound { kind: CapabilityKind, key: String },
}

/// String-keyed registry of providers for a single capability kind.
///
/// Registering an existing key replaces the previous binding. Providers are
/// handed in as sole-owning boxes and handed out as shared handles, so a
/// resolved provider can be adopted by the core system while the registry
/// keeps its own binding.
pub struct ProviderRegistry<P: ?Sized> {
    kind: CapabilityKind,
    providers: HashMap<String, Arc<P>>,
}

impl<P: ?Sized> ProviderRegistry<P> {
    /// Create an empty registry for the given capability kind.
    pub fn new(kind: CapabilityKind) -> Self {
        Self {
            kind,
            providers: HashMap::new(),
        }
    }

    /// The capability kind this registry serves.
    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    /// Register a provider under `key`.
    ///
    /// Returns `true` if an earlier binding for the same key was replaced.
    pub fn register(&mut self, key: impl Into<String>, provider: Box<P>) -> bool {
        let key = key.into();
        let replaced = self.providers.insert(key.clone(), Arc::from(provider)).is_some();
        if replaced {
            tracing::debug!("Replaced {} provider '{}'", self.kind, key);
        } else {
            tracing::debug!("Registered {} provider '{}'", self.kind, key);
        }
        replaced
    }

    /// Look up the provider registered under `key`.
    pub fn lookup(&self, key: &str) -> Result<Arc<P>, RegistryError> {
        self.providers
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                kind: self.kind,
                key: key.to_string(),
            })
    }

    /// Check whether `key` is bound.
    pub fn contains(&self, key: &str) -> bool {
        self.providers.contains_key(key)
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Camera factories, keyed by backend name (e.g. `"image"`, `"blank"`).
pub type CameraRegistry = ProviderRegistry<dyn CameraFactory>;
/// Mii selector applets.
pub type MiiSelectorRegistry = ProviderRegistry<dyn MiiSelector>;
/// Software keyboard applets.
pub type SoftwareKeyboardRegistry = ProviderRegistry<dyn SoftwareKeyboard>;
/// Image decode/encode backends.
pub type ImageInterfaceRegistry = ProviderRegistry<dyn ImageInterface>;

impl CameraRegistry {
    /// Create an empty camera registry.
    pub fn cameras() -> Self {
        Self::new(CapabilityKind::Camera)
    }
}

impl MiiSelectorRegistry {
    /// Create an empty Mii selector registry.
    pub fn mii_selectors() -> Self {
        Self::new(CapabilityKind::MiiSelector)
    }
}

impl SoftwareKeyboardRegistry {
    /// Create an empty software keyboard registry.
    pub fn software_keyboards() -> Self {
        Self::new(CapabilityKind::SoftwareKeyboard)
    }
}

impl ImageInterfaceRegistry {
    /// Create an empty image interface registry.
    pub fn image_interfaces() -> Self {
        Self::new(CapabilityKind::ImageInterface)
    }
}

/// One registry per capability kind.
///
/// The [`System`](crate::System) owns the process-wide set, so providers stay
/// resolvable by key for as long as the system lives.
pub struct Registries {
    pub cameras: CameraRegistry,
    pub mii_selectors: MiiSelectorRegistry,
    pub software_keyboards: SoftwareKeyboardRegistry,
    pub image_interfaces: ImageInterfaceRegistry,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

impl Registries {
    pub fn new() -> Self {
        Self {
            cameras: CameraRegistry::cameras(),
            mii_selectors: MiiSelectorRegistry::mii_selectors(),
            software_keyboards: SoftwareKeyboardRegistry::software_keyboards(),
            image_interfaces: ImageInterfaceRegistry::image_interfaces(),
        }
    }

    /// Registered keys of the given kind, sorted.
    pub fn keys(&self, kind: CapabilityKind) -> Vec<&str> {
        match kind {
            CapabilityKind::Camera => self.cameras.keys(),
            CapabilityKind::MiiSelector => self.mii_selectors.keys(),
            CapabilityKind::SoftwareKeyboard => self.software_keyboards.keys(),
            CapabilityKind::ImageInterface => self.image_interfaces.keys(),
        }
    }
}
