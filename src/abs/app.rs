//! Browser host.
//!
//! This module defines the [`App`] struct which creates the canvas and its WebGL context,
//! and drives a [`FrameScheduler`] from `requestAnimationFrame`.

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{Document, Element, HtmlCanvasElement, WebGlRenderingContext, Window};

use crate::{
    config::SceneConfig,
    error::RenderError,
    render::{FpsSink, FrameScheduler, StopHandle, request_next_frame},
};

type FrameCallback = Closure<dyn FnMut()>;

/// The page elements and GL context the renderer draws with.
pub struct App {
    pub window: Window,
    pub canvas: HtmlCanvasElement,
    pub gl: Rc<glow::Context>,
    fps: Element,
}

impl App {
    /// Appends a canvas to `#container_id`, sized to the client area of `#size_id`, and
    /// creates a WebGL context on it. The frame rate is written into `#fps_id`.
    pub fn new(container_id: &str, size_id: &str, fps_id: &str) -> Result<Self, RenderError> {
        let window = web_sys::window().ok_or_else(|| RenderError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| RenderError::Host("no document".into()))?;
        let container = element(&document, container_id)?;
        let fps = element(&document, fps_id)?;
        let (width, height) = measure(&window, &document, size_id);

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| RenderError::Host("created element is not a canvas".into()))?;
        canvas.set_id("canvas");
        canvas.set_width(width);
        canvas.set_height(height);
        container.append_child(&canvas).map_err(js_error)?;

        let context: WebGlRenderingContext = canvas
            .get_context("webgl")
            .map_err(js_error)?
            .ok_or_else(|| RenderError::Host("WebGL is not supported".into()))?
            .dyn_into()
            .map_err(|_| RenderError::Host("context is not a WebGL context".into()))?;
        let gl = Rc::new(glow::Context::from_webgl1_context(context));

        log::info!("Created {width}x{height} canvas in #{container_id}");

        Ok(Self {
            window,
            canvas,
            gl,
            fps,
        })
    }

    /// Sets up the scene and starts the animation loop.
    ///
    /// Each frame re-requests the next one until the returned handle is stopped, at which
    /// point the loop lets go of the scheduler and its GPU resources.
    pub fn run(self, config: &SceneConfig) -> Result<StopHandle, RenderError> {
        let mut scheduler = FrameScheduler::new(&self.gl, config, TextSink(self.fps))?;
        let stop = scheduler.stop_handle();

        let frame: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let next = Rc::clone(&frame);
        let window = self.window.clone();

        // The closure owns the scheduler and keeps itself alive through `next`. Taking it
        // out of the cell ends the loop and releases the scheduler's GPU resources.
        *frame.borrow_mut() = Some(Closure::new(move || {
            if scheduler.tick().is_break() {
                drop(next.borrow_mut().take());
                return;
            }
            if let Err(err) =
                request_next_frame(&next, |callback| request_animation_frame(&window, callback))
            {
                log::error!("Could not schedule next frame: {err}");
            }
        }));

        request_next_frame(&frame, |callback| {
            request_animation_frame(&self.window, callback)
        })?;
        Ok(stop)
    }
}

/// Writes the frame rate into a page element.
pub struct TextSink(pub Element);

impl FpsSink for TextSink {
    fn publish(&mut self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

fn element(document: &Document, id: &str) -> Result<Element, RenderError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| RenderError::Host(format!("no element with id `{id}`")))
}

/// Client size of `#id`, or the window's inner size if that element is missing or empty.
fn measure(window: &Window, document: &Document, id: &str) -> (u32, u32) {
    let measured = document
        .get_element_by_id(id)
        .map(|e| (e.client_width(), e.client_height()))
        .filter(|&(w, h)| w > 0 && h > 0);
    match measured {
        Some((w, h)) => (w as u32, h as u32),
        None => {
            let dim = |v: Result<JsValue, JsValue>| {
                v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
            };
            (dim(window.inner_width()), dim(window.inner_height()))
        }
    }
}

fn request_animation_frame(window: &Window, callback: &FrameCallback) -> Result<(), RenderError> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map(drop)
        .map_err(js_error)
}

fn js_error(err: JsValue) -> RenderError {
    RenderError::Host(format!("{err:?}"))
}
