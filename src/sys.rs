//! Host-facing types: geometry, displays and the compositor interface.

pub mod geometry;
pub mod host;
pub mod screen;
pub mod sim;
