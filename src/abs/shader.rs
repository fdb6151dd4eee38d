//! Shaders
//!
//! This module defines the [`Shader`] and [`ShaderPipeline`] structs for compiling, linking
//! and feeding the triangle's GL program.

use std::rc::Rc;

use glam::Mat4;

use super::GraphicsContext;
use crate::error::{RenderError, ShaderStage};

/// Represents an individual compiled shader stage.
pub struct Shader<G: GraphicsContext> {
    gl: Rc<G>,
    id: G::Shader,
}

impl<G: GraphicsContext> Shader<G> {
    /// Compiles a new shader from the given source code.
    ///
    /// On failure the compiler's info log is returned inside the error.
    pub fn new(gl: &Rc<G>, stage: ShaderStage, source: &str) -> Result<Self, RenderError> {
        let shader = gl
            .create_shader(stage.gl_kind())
            .map_err(|reason| RenderError::Allocation {
                what: "shader",
                reason,
            })?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(RenderError::Compile { stage, log });
        }
        log::debug!("Compiled {stage} shader");

        Ok(Self {
            gl: Rc::clone(gl),
            id: shader,
        })
    }
}

impl<G: GraphicsContext> Drop for Shader<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// The linked GL program used to draw the triangle.
pub struct ShaderPipeline<G: GraphicsContext> {
    gl: Rc<G>,
    id: G::Program,
}

impl<G: GraphicsContext> ShaderPipeline<G> {
    /// Compiles both stages, links them and makes the result the current program.
    pub fn build(
        gl: &Rc<G>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, RenderError> {
        let vert = Shader::new(gl, ShaderStage::Vertex, vertex_source)?;
        let frag = Shader::new(gl, ShaderStage::Fragment, fragment_source)?;
        let pipeline = Self::link(gl, &[&vert, &frag])?;
        pipeline.use_program();
        log::debug!("Linked shader program");
        Ok(pipeline)
    }

    /// Links a new program from already compiled shaders.
    pub fn link(gl: &Rc<G>, shaders: &[&Shader<G>]) -> Result<Self, RenderError> {
        let program = gl
            .create_program()
            .map_err(|reason| RenderError::Allocation {
                what: "shader program",
                reason,
            })?;

        for shader in shaders {
            gl.attach_shader(program, shader.id);
        }

        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(RenderError::Link(log));
        }

        for shader in shaders {
            gl.detach_shader(program, shader.id);
        }

        Ok(Self {
            gl: Rc::clone(gl),
            id: program,
        })
    }

    /// Binds the program for use.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.id));
    }

    /// Looks up where per-vertex data for attribute `name` is fed.
    pub fn bind_attribute(&self, name: &str) -> Result<u32, RenderError> {
        self.gl
            .get_attrib_location(self.id, name)
            .ok_or_else(|| RenderError::MissingAttribute(name.to_string()))
    }

    /// Looks up the location of uniform `name`.
    pub fn bind_uniform(&self, name: &str) -> Result<G::UniformLocation, RenderError> {
        self.gl
            .get_uniform_location(self.id, name)
            .ok_or_else(|| RenderError::MissingUniform(name.to_string()))
    }

    /// Uploads `matrix` column-major into the uniform at `location`.
    ///
    /// The program has to be current.
    pub fn set_transform(&self, location: &G::UniformLocation, matrix: &Mat4) {
        self.gl
            .uniform_matrix_4_f32_slice(Some(location), false, &matrix.to_cols_array());
    }
}

impl<G: GraphicsContext> Drop for ShaderPipeline<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}
