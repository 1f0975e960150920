//! Shared windowing and rendering plumbing
//!
//! Window/GPU setup and the camera that maps normalized simulation space onto
//! the window. Nothing here knows about physics.

pub mod camera;
pub mod graphics;

pub use camera::*;
pub use graphics::*;
