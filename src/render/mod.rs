//! Module for anything related to rendering.
//!
//! This module contains the rotation transform, the frame-rate meter, the render loop and
//! the embedded shaders.

pub mod fps;
pub mod scheduler;
pub mod transform;

pub use fps::*;
pub use scheduler::*;
pub use transform::*;

pub const VERTEX_SHADER: &str = include_str!("shaders/triangle/vert.glsl");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/triangle/frag.glsl");

/// Name of the vertex position attribute in [`VERTEX_SHADER`].
pub const POSITION_ATTRIBUTE: &str = "coordinates";
/// Name of the transform uniform in [`VERTEX_SHADER`].
pub const TRANSFORM_UNIFORM: &str = "modelview";
