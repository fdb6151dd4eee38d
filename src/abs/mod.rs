//! This module contains the GL-facing building blocks of the renderer,
//! including the context abstraction, shader management, geometry buffers and the
//! browser host.

#[cfg(target_arch = "wasm32")]
pub mod app;
pub mod context;
pub mod mesh;
pub mod shader;
#[cfg(test)]
pub mod testing;

#[cfg(target_arch = "wasm32")]
pub use app::*;
pub use context::*;
pub use mesh::*;
pub use shader::*;
