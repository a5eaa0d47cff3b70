use std::time::{Duration, Instant};

/// Frame-rate statistics over a run.
///
/// Call [`Performance::start`] at the top of a frame and [`Performance::fps`] at the
/// bottom. Every `fps` sample is added to the running average.
#[derive(Clone, Debug)]
pub struct Performance {
    started: Instant,
    samples: u32,
    total_fps: f32,
}

impl Default for Performance {
    fn default() -> Self {
        Self::new()
    }
}

impl Performance {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            samples: 0,
            total_fps: 0.0,
        }
    }

    pub fn start(&mut self) {
        self.started = Instant::now();
    }

    /// Frames per second implied by the time since [`Performance::start`].
    ///
    /// Returns 0 without recording a sample when the clock has not moved.
    pub fn fps(&mut self) -> f32 {
        self.record(self.started.elapsed())
    }

    pub fn average_fps(&self) -> f32 {
        if self.samples == 0 {
            return 0.0;
        }
        self.total_fps / self.samples as f32
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn reset(&mut self) {
        self.samples = 0;
        self.total_fps = 0.0;
    }

    fn record(&mut self, elapsed: Duration) -> f32 {
        let ms = elapsed.as_secs_f32() * 1000.0;
        if ms <= 0.0 {
            return 0.0;
        }
        let fps = 1000.0 / ms;
        self.samples += 1;
        self.total_fps += fps;
        fps
    }
}
