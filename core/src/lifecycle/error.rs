//! Lifecycle error types

use thiserror::Error;

use super::state::LifecycleState;
use crate::system::SystemError;

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
    #[error("failed to create main window: {0:#}")]
    WindowCreation(anyhow::Error),
    #[error("failed to register capability providers: {0:#}")]
    Registration(anyhow::Error),
    #[error(transparent)]
    System(#[from] SystemError),
}
