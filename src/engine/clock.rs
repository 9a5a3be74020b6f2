//! Host clock abstractions driving the visualization tick.

use std::time::Instant;

/// Monotonic millisecond clock read once per tick.
pub trait FrameClock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`, zeroed at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemFrameClock {
    origin: Instant,
}

impl SystemFrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemFrameClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Fixed-step clock for tests and offline rendering.
///
/// Time only moves when `advance()` is called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualFrameClock {
    now_ms: f64,
    step_ms: f64,
}

impl ManualFrameClock {
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            step_ms,
        }
    }

    /// Clock stepping one frame at `frames_per_second`, starting at zero
    pub fn from_fps(frames_per_second: u32) -> Self {
        Self::new(0.0, 1000.0 / frames_per_second.max(1) as f64)
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    /// Move forward one step and return the new time
    pub fn advance(&mut self) -> f64 {
        self.now_ms += self.step_ms;
        self.now_ms
    }

    pub fn set(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }
}

impl FrameClock for ManualFrameClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
