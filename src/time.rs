//! Frame timing for the scene loop.
//!
//! [`Clock`] is the single source of elapsed and delta time when the caller
//! does not bring its own (a render loop usually supplies its own delta).
//! Deltas are clamped: a stall (debugger, tab in background) produces one
//! capped step instead of a giant jump, and the morph engine additionally
//! treats non-positive deltas as "no movement".
//!
//! ```ignore
//! let mut clock = Clock::new();
//! loop {
//!     let (elapsed, dt) = clock.tick();
//!     scene.update(dt);
//! }
//! ```

use std::time::Instant;

/// Longest delta a single tick may report, in seconds.
const MAX_DELTA: f32 = 0.25;

/// Wall-clock frame timer.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_tick: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    /// Fixed delta for deterministic stepping; `None` uses real time.
    fixed_delta: Option<f32>,
}

impl Clock {
    /// Start a clock at zero elapsed time.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fixed_delta: None,
        }
    }

    /// Advance one frame; returns `(elapsed, delta)` in seconds.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        self.delta_secs = match self.fixed_delta {
            Some(fixed) => fixed.max(0.0),
            None => raw.min(MAX_DELTA),
        };
        self.elapsed_secs = match self.fixed_delta {
            // Fixed stepping accumulates its own timeline.
            Some(_) => self.elapsed_secs + self.delta_secs,
            None => now.duration_since(self.start).as_secs_f32(),
        };
        self.frame_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since the clock started (or accumulated fixed steps).
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds covered by the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Use a fixed delta per tick, for deterministic tests and replays.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
