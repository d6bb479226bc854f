//! Per-frame inputs shared by every agent update.

use glam::Vec2;

/// Read-only snapshot handed to each agent during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Flow-field time offset for this frame.
    pub time: f32,
    /// Elapsed seconds since the previous frame.
    pub dt: f32,
    /// Pointer position in buffer coordinates, `None` when it is outside the
    /// drawn area.
    pub pointer: Option<Vec2>,
}

impl FrameContext {
    pub fn new(time: f32, dt: f32, pointer: Option<Vec2>) -> Self {
        Self { time, dt, pointer }
    }
}
