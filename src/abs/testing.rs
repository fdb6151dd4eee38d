//! A fake [`GraphicsContext`] that records what the renderer asks of it.
//!
//! Handles are plain integers. "Compiling" a shader only checks that the source has a
//! `main` function and balanced braces, and attribute/uniform lookups scan the linked
//! sources for matching declarations, which is enough to drive the renderer's error paths.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
};

use super::GraphicsContext;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(Option<u32>),
    UniformMatrix4 {
        location: u32,
        transpose: bool,
        values: Vec<f32>,
    },
    BindBuffer {
        target: u32,
        buffer: Option<u32>,
    },
    BufferData {
        target: u32,
        usage: u32,
    },
    VertexAttribPointer {
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    ClearColor([f32; 4]),
    Clear(u32),
    Enable(u32),
    Viewport([i32; 4]),
    DrawElements {
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
    },
    DeleteShader(u32),
    DeleteProgram(u32),
    DeleteBuffer(u32),
}

#[derive(Default)]
pub struct RecordingContext {
    next_handle: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    shader_sources: RefCell<HashMap<u32, String>>,
    compiled: RefCell<HashMap<u32, bool>>,
    attached: RefCell<HashMap<u32, Vec<u32>>>,
    linked_sources: RefCell<HashMap<u32, Vec<String>>>,
    bound: RefCell<HashMap<u32, u32>>,
    buffer_data: RefCell<HashMap<u32, Vec<u8>>>,
    errors: RefCell<VecDeque<u32>>,
    draw_errors: RefCell<Vec<u32>>,
    refuse_buffers: Cell<bool>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn draw_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::DrawElements { .. }))
            .count()
    }

    /// The bytes last uploaded into `buffer`.
    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.buffer_data.borrow().get(&buffer).cloned()
    }

    /// Raises the error flag `code`, as if an earlier call had failed.
    ///
    /// Flags are reported by [`GraphicsContext::get_error`] one at a time, oldest first.
    pub fn inject_error(&self, code: u32) {
        self.errors.borrow_mut().push_back(code);
    }

    /// Makes the next draw call raise every flag in `codes`.
    pub fn fail_next_draw(&self, codes: &[u32]) {
        *self.draw_errors.borrow_mut() = codes.to_vec();
    }

    /// Makes every following buffer allocation fail.
    pub fn refuse_buffers(&self) {
        self.refuse_buffers.set(true);
    }

    fn handle(&self) -> u32 {
        let next = self.next_handle.get() + 1;
        self.next_handle.set(next);
        next
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn declared(&self, program: u32, qualifier: &str, name: &str) -> Option<u32> {
        let sources = self.linked_sources.borrow();
        sources
            .get(&program)?
            .iter()
            .flat_map(|source| source.lines())
            .filter(|line| line.trim_start().starts_with(qualifier))
            .position(|line| {
                line.trim().trim_end_matches(';').split_whitespace().last() == Some(name)
            })
            .map(|index| index as u32)
    }
}

fn looks_valid(source: &str) -> bool {
    let mut depth = 0i32;
    for c in source.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0 && source.contains("void main")
}

impl GraphicsContext for RecordingContext {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = u32;

    fn create_shader(&self, _shader_type: u32) -> Result<u32, String> {
        Ok(self.handle())
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.shader_sources
            .borrow_mut()
            .insert(shader, source.to_string());
    }

    fn compile_shader(&self, shader: u32) {
        let ok = self
            .shader_sources
            .borrow()
            .get(&shader)
            .is_some_and(|source| looks_valid(source));
        self.compiled.borrow_mut().insert(shader, ok);
    }

    fn get_shader_compile_status(&self, shader: u32) -> bool {
        self.compiled.borrow().get(&shader).copied().unwrap_or(false)
    }

    fn get_shader_info_log(&self, shader: u32) -> String {
        if self.get_shader_compile_status(shader) {
            String::new()
        } else {
            "ERROR: 0:1: '' : syntax error".to_string()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        Ok(self.handle())
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.attached
            .borrow_mut()
            .entry(program)
            .or_default()
            .push(shader);
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(shaders) = self.attached.borrow_mut().get_mut(&program) {
            shaders.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: u32) {
        let attached = self.attached.borrow();
        let compiled = self.compiled.borrow();
        let shaders = attached.get(&program).cloned().unwrap_or_default();
        if shaders.is_empty() || !shaders.iter().all(|s| compiled.get(s) == Some(&true)) {
            return;
        }
        let sources = self.shader_sources.borrow();
        let linked = shaders
            .iter()
            .filter_map(|s| sources.get(s).cloned())
            .collect();
        self.linked_sources.borrow_mut().insert(program, linked);
    }

    fn get_program_link_status(&self, program: u32) -> bool {
        self.linked_sources.borrow().contains_key(&program)
    }

    fn get_program_info_log(&self, program: u32) -> String {
        if self.get_program_link_status(program) {
            String::new()
        } else {
            "ERROR: program has unresolved shader stages".to_string()
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn get_attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        self.declared(program, "attribute", name)
    }

    fn get_uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.declared(program, "uniform", name)
    }

    fn uniform_matrix_4_f32_slice(&self, location: Option<&u32>, transpose: bool, v: &[f32]) {
        if let Some(&location) = location {
            self.record(Call::UniformMatrix4 {
                location,
                transpose,
                values: v.to_vec(),
            });
        }
    }

    fn create_buffer(&self) -> Result<u32, String> {
        if self.refuse_buffers.get() {
            return Err("out of memory".to_string());
        }
        Ok(self.handle())
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        match buffer {
            Some(buffer) => self.bound.borrow_mut().insert(target, buffer),
            None => self.bound.borrow_mut().remove(&target),
        };
        self.record(Call::BindBuffer { target, buffer });
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        if let Some(&buffer) = self.bound.borrow().get(&target) {
            self.buffer_data.borrow_mut().insert(buffer, data.to_vec());
        }
        self.record(Call::BufferData { target, usage });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::VertexAttribPointer {
            index,
            size,
            data_type,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear(&self, mask: u32) {
        self.record(Call::Clear(mask));
    }

    fn enable(&self, parameter: u32) {
        self.record(Call::Enable(parameter));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport([x, y, width, height]));
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        let raised = std::mem::take(&mut *self.draw_errors.borrow_mut());
        self.errors.borrow_mut().extend(raised);
        self.record(Call::DrawElements {
            mode,
            count,
            element_type,
            offset,
        });
    }

    fn get_error(&self) -> u32 {
        self.errors
            .borrow_mut()
            .pop_front()
            .unwrap_or(glow::NO_ERROR)
    }
}
