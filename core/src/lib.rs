//! Ferrite Core - frontend bootstrap framework
//!
//! This crate provides the pieces a frontend binary needs to bring the
//! emulated system up and take it down again in a well-defined order.
//!
//! # Architecture
//!
//! - [`System`] - Process-wide core system handle; holds one provider per capability kind
//! - [`ProviderRegistry`] - String-keyed registry of providers for one capability kind
//! - [`DetachedTasks`] - Fire-and-forget background work with a shutdown barrier
//! - [`SurfaceFormat`] - Default rendering surface format, applied before any window exists
//! - [`LifecycleController`] - Startup/shutdown state machine driving a [`HostEnvironment`]

pub mod config;
pub mod frontend;
pub mod lifecycle;
pub mod platform;
pub mod registry;
pub mod surface;
pub mod system;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;

pub use config::{AppIdentity, Config};
pub use lifecycle::{
    ActivityHandler, ActivityState, HostEnvironment, LifecycleController, LifecycleError,
    LifecycleState, RegistrationContext, WindowSpec,
};
pub use registry::{CapabilityKind, ProviderRegistry, RegistryError};
pub use surface::{ContextSharing, SurfaceFormat, SurfaceProfile, SwapBehavior};
pub use system::{PowerState, System, SystemError};
pub use tasks::DetachedTasks;
