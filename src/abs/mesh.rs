//! Geometry upload.
//!
//! This module defines the [`GeometryStore`] struct which owns the triangle's vertex and
//! index buffers on the GPU side.

use std::rc::Rc;

use super::GraphicsContext;
use crate::{config::Geometry, error::RenderError};

/// The triangle's vertex and index buffers.
pub struct GeometryStore<G: GraphicsContext> {
    gl: Rc<G>,
    vbo: G::Buffer,
    ebo: G::Buffer,
    index_count: usize,
}

impl<G: GraphicsContext> GeometryStore<G> {
    /// Creates both buffers and uploads the geometry once with a static usage hint.
    pub fn new(gl: &Rc<G>, geometry: &Geometry) -> Result<Self, RenderError> {
        geometry.validate()?;

        let vbo = gl.create_buffer().map_err(|reason| RenderError::Allocation {
            what: "vertex buffer",
            reason,
        })?;
        let ebo = match gl.create_buffer() {
            Ok(ebo) => ebo,
            Err(reason) => {
                gl.delete_buffer(vbo);
                return Err(RenderError::Allocation {
                    what: "index buffer",
                    reason,
                });
            }
        };

        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(geometry.vertices.as_slice()),
            glow::STATIC_DRAW,
        );
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(geometry.indices.as_slice()),
            glow::STATIC_DRAW,
        );
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

        log::debug!(
            "Uploaded {} vertices and {} indices",
            geometry.vertices.len(),
            geometry.indices.len()
        );

        Ok(Self {
            gl: Rc::clone(gl),
            vbo,
            ebo,
            index_count: geometry.indices.len(),
        })
    }

    /// Binds the vertex buffer to `ARRAY_BUFFER` and the index buffer to
    /// `ELEMENT_ARRAY_BUFFER`.
    ///
    /// Done before every draw; nothing is cached about what is currently bound.
    pub fn bind(&self) {
        self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
        self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ebo));
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn vertex_buffer(&self) -> G::Buffer {
        self.vbo
    }

    pub fn index_buffer(&self) -> G::Buffer {
        self.ebo
    }
}

impl<G: GraphicsContext> Drop for GeometryStore<G> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.vbo);
        self.gl.delete_buffer(self.ebo);
    }
}
