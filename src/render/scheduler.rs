//! The render loop.
//!
//! [`FrameScheduler`] owns every GPU resource the triangle needs and draws one frame per
//! [`FrameScheduler::tick`]. Ticks are driven from outside (the browser's animation-frame
//! callback); the returned [`ControlFlow`] says whether the host should ask for another one.

use std::{
    cell::{Cell, RefCell},
    f32::consts::TAU,
    ops::ControlFlow,
    rc::Rc,
};

use super::{
    FRAGMENT_SHADER, FpsSink, FrameTiming, POSITION_ATTRIBUTE, TRANSFORM_UNIFORM, VERTEX_SHADER,
    format_fps, rotation_matrix,
};
use crate::{
    abs::{GeometryStore, GraphicsContext, ShaderPipeline},
    config::{SceneConfig, Viewport},
    error::RenderError,
};

/// Upper bound on error flags cleared in one go.
const MAX_ERROR_FLAGS: usize = 16;

/// Where the loop is in its lifetime. Before construction it is uninitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Resources are set up, no frame drawn yet.
    Ready,
    Running,
    /// A stop was requested; no more frames will be drawn.
    Stopped,
}

/// Asks a running [`FrameScheduler`] to stop before its next frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// The triangle's rotation, advanced by a fixed step every frame.
///
/// The step does not depend on how long a frame took, so the triangle spins faster on
/// displays with a higher refresh rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    angle: f32,
    step: f32,
    ticks: u64,
}

impl Rotation {
    pub fn new(step: f32) -> Self {
        Self {
            angle: 0.0,
            step,
            ticks: 0,
        }
    }

    /// Advances by one step and returns the new angle, kept in `[0, 2π)`.
    pub fn advance(&mut self) -> f32 {
        self.angle = (self.angle + self.step).rem_euclid(TAU);
        self.ticks += 1;
        self.angle
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

pub struct FrameScheduler<G: GraphicsContext, S: FpsSink> {
    gl: Rc<G>,
    geometry: GeometryStore<G>,
    pipeline: ShaderPipeline<G>,
    position: u32,
    transform: G::UniformLocation,
    viewport: Viewport,
    clear_color: [f32; 4],
    rotation: Rotation,
    sink: S,
    state: SchedulerState,
    stop: StopHandle,
    failed_frames: u64,
}

impl<G: GraphicsContext, S: FpsSink> FrameScheduler<G, S> {
    /// Sets up the triangle with the embedded shaders.
    pub fn new(gl: &Rc<G>, config: &SceneConfig, sink: S) -> Result<Self, RenderError> {
        Self::with_shaders(gl, config, VERTEX_SHADER, FRAGMENT_SHADER, sink)
    }

    /// Uploads the geometry, builds the shader program and resolves its bindings.
    ///
    /// Any failure here is fatal; nothing is drawn.
    pub fn with_shaders(
        gl: &Rc<G>,
        config: &SceneConfig,
        vertex_source: &str,
        fragment_source: &str,
        sink: S,
    ) -> Result<Self, RenderError> {
        let geometry = GeometryStore::new(gl, &config.geometry)?;
        let pipeline = ShaderPipeline::build(gl, vertex_source, fragment_source)?;
        let position = pipeline.bind_attribute(POSITION_ATTRIBUTE)?;
        let transform = pipeline.bind_uniform(TRANSFORM_UNIFORM)?;

        log::info!(
            "Renderer ready: {} indices, {}x{} viewport",
            geometry.index_count(),
            config.viewport.width,
            config.viewport.height
        );

        Ok(Self {
            gl: Rc::clone(gl),
            geometry,
            pipeline,
            position,
            transform,
            viewport: config.viewport,
            clear_color: config.clear_color,
            rotation: Rotation::new(config.rotation_step),
            sink,
            state: SchedulerState::Ready,
            stop: StopHandle::default(),
            failed_frames: 0,
        })
    }

    /// Runs one frame.
    ///
    /// A frame whose GL calls fail is dropped and logged, but the loop keeps going:
    /// only a stop request yields [`ControlFlow::Break`].
    pub fn tick(&mut self) -> ControlFlow<()> {
        if self.stop.is_stopped() {
            if self.state != SchedulerState::Stopped {
                log::warn!("Render loop stopped after {} frames", self.rotation.ticks());
                self.state = SchedulerState::Stopped;
            }
            return ControlFlow::Break(());
        }
        self.state = SchedulerState::Running;

        let timing = FrameTiming::start();
        let angle = self.rotation.advance();

        match self.draw(angle) {
            Ok(()) => {
                let timing = timing.finish();
                self.sink.publish(&format_fps(timing.frames_per_second()));
            }
            Err(err) => {
                self.failed_frames += 1;
                log::error!(
                    "Dropped frame {} ({} so far): {err}",
                    self.rotation.ticks(),
                    self.failed_frames
                );
            }
        }

        ControlFlow::Continue(())
    }

    fn draw(&self, angle: f32) -> Result<(), RenderError> {
        let gl = &self.gl;
        if let Some(stale) = self.take_error() {
            log::warn!("Discarding GL error 0x{stale:04X} raised before this frame");
        }

        let [r, g, b, a] = self.clear_color;
        gl.clear_color(r, g, b, a);
        gl.clear(glow::COLOR_BUFFER_BIT);
        gl.enable(glow::DEPTH_TEST);
        gl.viewport(0, 0, self.viewport.width, self.viewport.height);

        self.pipeline.use_program();
        self.pipeline
            .set_transform(&self.transform, &rotation_matrix(angle));

        self.geometry.bind();
        gl.vertex_attrib_pointer_f32(self.position, 3, glow::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(self.position);

        gl.draw_elements(
            glow::TRIANGLES,
            self.geometry.index_count() as i32,
            glow::UNSIGNED_SHORT,
            0,
        );

        match self.take_error() {
            None => Ok(()),
            Some(code) => Err(RenderError::Frame(code)),
        }
    }

    /// Clears every raised GL error flag and returns the first one.
    fn take_error(&self) -> Option<u32> {
        let first = self.gl.get_error();
        if first == glow::NO_ERROR {
            return None;
        }
        // A lost context may keep reporting errors; don't spin on it.
        for _ in 0..MAX_ERROR_FLAGS {
            if self.gl.get_error() == glow::NO_ERROR {
                break;
            }
        }
        Some(first)
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }
}

/// Hands the callback in `slot` to `request` so the host calls it again.
///
/// If the request fails the callback is taken out of `slot` and dropped, together with
/// whatever it owns; the loop has ended either way.
pub fn request_next_frame<T, E>(
    slot: &RefCell<Option<T>>,
    request: impl FnOnce(&T) -> Result<(), E>,
) -> Result<(), E> {
    let scheduled = slot.borrow().as_ref().map(request);
    match scheduled {
        Some(Err(err)) => {
            drop(slot.borrow_mut().take());
            Err(err)
        }
        _ => Ok(()),
    }
}
