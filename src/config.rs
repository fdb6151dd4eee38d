//! Scene constants.
//!
//! Everything the renderer treats as fixed (viewport, clear color, rotation speed and the
//! triangle itself) is kept in `assets/scene.json`, embedded at compile time.

use serde::Deserialize;

use crate::error::RenderError;

const SCENE_JSON: &str = include_str!("assets/scene.json");

pub const VERTEX_COUNT: usize = 3;
pub const INDEX_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

/// The triangle: three positions and the order they are drawn in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geometry {
    pub vertices: [[f32; 3]; VERTEX_COUNT],
    pub indices: [u16; INDEX_COUNT],
}

impl Geometry {
    /// Checks that every index refers to an existing vertex.
    pub fn validate(&self) -> Result<(), RenderError> {
        match self
            .indices
            .iter()
            .find(|&&index| index as usize >= self.vertices.len())
        {
            Some(&index) => Err(RenderError::InvalidGeometry {
                index,
                vertex_count: self.vertices.len(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneConfig {
    pub viewport: Viewport,
    pub clear_color: [f32; 4],
    /// Radians added to the rotation every frame.
    pub rotation_step: f32,
    pub geometry: Geometry,
}

impl SceneConfig {
    pub fn from_json(s: &str) -> Result<Self, RenderError> {
        let config: SceneConfig = serde_json::from_str(s)?;
        config.geometry.validate()?;
        Ok(config)
    }

    /// The configuration shipped with the crate.
    pub fn embedded() -> Result<Self, RenderError> {
        Self::from_json(SCENE_JSON)
    }
}
