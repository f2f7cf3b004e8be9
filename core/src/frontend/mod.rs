//! Frontend capability contracts
//!
//! Interfaces the core system delegates to the frontend: camera sources,
//! UI applets and the image codec. The frontend binary supplies concrete
//! implementations; this crate only ships the fallbacks used when nothing
//! better is registered.

pub mod applets;
pub mod camera;
pub mod default_applets;
pub mod image_interface;

pub use default_applets::register_default_applets;
