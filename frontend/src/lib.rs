//! Ferrite desktop frontend
//!
//! Implements the core's host environment on winit and ships the concrete
//! capability providers: still-image camera, dialog Mii selector, terminal
//! software keyboard and PNG codec.

pub mod app;
pub mod applets;
pub mod camera;
pub mod host;
pub mod image_interface;
