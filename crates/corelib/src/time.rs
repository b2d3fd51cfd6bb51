//! Frame timing: per-frame delta, elapsed time and an FPS counter.

use std::time::{Duration, Instant};

/// Timing for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Seconds since the clock started.
    pub elapsed: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start, last: start }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let delta = now.saturating_duration_since(self.last);
        self.last = now;
        FrameTime {
            delta: delta.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages frame rate over a fixed window.
#[derive(Clone, Copy, Debug)]
pub struct FpsCounter {
    window: Duration,
    frames: u32,
    accumulated: Duration,
}

impl FpsCounter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            frames: 0,
            accumulated: Duration::ZERO,
        }
    }

    /// Record one frame; returns the average FPS each time the window fills.
    pub fn record(&mut self, delta: Duration) -> Option<f32> {
        self.frames += 1;
        self.accumulated += delta;
        if self.accumulated < self.window {
            return None;
        }
        let fps = self.frames as f32 / self.accumulated.as_secs_f32();
        self.frames = 0;
        self.accumulated = Duration::ZERO;
        Some(fps)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
