//! Application initialization error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(String),
    #[error("No {kind} provider available (requested '{requested}')")]
    NoProvider {
        kind: ferrite_core::CapabilityKind,
        requested: String,
    },
}
