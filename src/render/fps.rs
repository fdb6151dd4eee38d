//! Frame-rate measurement.

use std::time::Duration;

use web_time::Instant;

/// Shown instead of a number when a frame took no measurable time.
pub const FPS_SENTINEL: &str = "FPS: --";

/// Receives the formatted frame rate once per frame.
pub trait FpsSink {
    fn publish(&mut self, text: &str);
}

impl<F: FnMut(&str)> FpsSink for F {
    fn publish(&mut self, text: &str) {
        self(text)
    }
}

/// Start and end of one frame's work.
#[derive(Debug, Clone, Copy)]
pub struct FrameTiming {
    pub start: Instant,
    pub end: Instant,
}

impl FrameTiming {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            end: now,
        }
    }

    pub fn finish(mut self) -> Self {
        self.end = Instant::now();
        self
    }

    /// Zero if the clock went backwards.
    pub fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }

    pub fn frames_per_second(&self) -> Option<f64> {
        frames_per_second(self.elapsed())
    }
}

/// `1 / elapsed`, or `None` when `elapsed` is zero.
pub fn frames_per_second(elapsed: Duration) -> Option<f64> {
    let seconds = elapsed.as_secs_f64();
    let fps = 1.0 / seconds;
    (seconds > 0.0 && fps.is_finite()).then_some(fps)
}

pub fn format_fps(fps: Option<f64>) -> String {
    match fps {
        Some(fps) => format!("FPS: {fps:.2}"),
        None => FPS_SENTINEL.to_string(),
    }
}
