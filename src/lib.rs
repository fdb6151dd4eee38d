//! A single green triangle spinning in a browser canvas.
//!
//! The crate builds to WebAssembly. [`render::FrameScheduler`] draws one frame per
//! animation-frame callback through [`glow`] and reports the frame rate to the page.

pub mod abs;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use crate::{abs::App, config::SceneConfig, error::RenderError, logging, render::StopHandle};

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if let Err(err) = logging::init(log::LevelFilter::Info) {
            web_sys::console::warn_1(&format!("Logger not installed: {err}").into());
        }
    }

    /// Handle to the running animation loop.
    #[wasm_bindgen]
    pub struct RenderLoop {
        stop: StopHandle,
    }

    #[wasm_bindgen]
    impl RenderLoop {
        /// Ends the loop before its next frame and releases its GPU resources.
        pub fn stop(&self) {
            self.stop.stop();
        }

        #[wasm_bindgen(getter)]
        pub fn stopped(&self) -> bool {
            self.stop.is_stopped()
        }
    }

    /// Creates the canvas inside `#container_id` and starts drawing.
    #[wasm_bindgen]
    pub fn run(container_id: &str, size_id: &str, fps_id: &str) -> Result<RenderLoop, JsValue> {
        let config = SceneConfig::embedded().map_err(setup_failed)?;
        let app = App::new(container_id, size_id, fps_id).map_err(setup_failed)?;
        let stop = app.run(&config).map_err(setup_failed)?;
        Ok(RenderLoop { stop })
    }

    fn setup_failed(err: RenderError) -> JsValue {
        log::error!("Setup failed: {err}");
        JsValue::from_str(&err.to_string())
    }
}
