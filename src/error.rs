//! Errors raised while setting up or drawing the scene.

use std::fmt;

/// A programmable stage of the GL pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The GL enum used to create a shader of this stage.
    pub fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The browser did not provide something the renderer needs
    /// (window, document, container element, WebGL context...).
    #[error("host environment unavailable: {0}")]
    Host(String),
    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {0}")]
    Link(String),
    #[error("attribute `{0}` is not used by the shader program")]
    MissingAttribute(String),
    #[error("uniform `{0}` is not used by the shader program")]
    MissingUniform(String),
    #[error("index {index} is out of range for {vertex_count} vertices")]
    InvalidGeometry { index: u16, vertex_count: usize },
    #[error("invalid scene configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// A GL call failed while drawing a frame. Only ever reported from inside
    /// the render loop.
    #[error("GL error 0x{0:04X} while drawing frame")]
    Frame(u32),
}
