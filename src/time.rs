//! Frame timing.
//!
//! [`FrameTimer`] turns wall-clock instants into per-frame elapsed seconds and
//! an FPS estimate. [`SimulationClock`] accumulates those elapsed seconds into
//! the time offset that animates the flow field.
//!
//! ```ignore
//! let mut timer = FrameTimer::new(config.max_frame_delta);
//! let mut clock = SimulationClock::new(config.time_increment);
//!
//! // In the frame loop:
//! let dt = timer.tick();
//! let t = clock.advance(dt);
//! ```

use std::time::{Duration, Instant};

/// Wall-clock frame timer.
#[derive(Debug)]
pub struct FrameTimer {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds, after clamping.
    delta_secs: f32,
    /// Largest delta reported, seconds.
    max_delta: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl FrameTimer {
    /// Create a timer starting now. Deltas longer than `max_delta` seconds
    /// are reported as `max_delta`.
    pub fn new(max_delta: f32) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_secs: 0.0,
            max_delta: max_delta.max(0.0),
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance to now. Call once per frame; returns the elapsed seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Advance to the given instant.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw_delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = raw_delta.min(self.max_delta);
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Seconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total ticks since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Monotonic time offset fed to the flow field.
///
/// Written once per frame and read by every particle during that frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    offset: f32,
    rate: f32,
}

impl SimulationClock {
    /// Create a clock at offset zero. Negative rates clamp to zero so the
    /// offset never decreases.
    pub fn new(rate: f32) -> Self {
        Self {
            offset: 0.0,
            rate: rate.max(0.0),
        }
    }

    /// Add `elapsed * rate` to the offset and return the new offset.
    pub fn advance(&mut self, elapsed: f32) -> f32 {
        self.offset += elapsed.max(0.0) * self.rate;
        self.offset
    }

    /// Current offset.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }
}
