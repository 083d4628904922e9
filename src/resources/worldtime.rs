//! Session clock resource.
//!
//! [`WorldTime`] is the only source of elapsed time for gameplay code. Pausing
//! the session sets `time_scale` to `0.0`, which freezes `delta` while the
//! host keeps calling [`update_world_time`](crate::systems::time::update_world_time)
//! every frame.
use bevy_ecs::prelude::Resource;

/// Normal gameplay speed.
pub const TIME_SCALE_NORMAL: f32 = 1.0;
/// Gameplay time halted.
pub const TIME_SCALE_HALTED: f32 = 0.0;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Scaled seconds accumulated since the environment started.
    pub elapsed: f32,
    /// Scaled seconds of the last frame.
    pub delta: f32,
    /// Multiplier applied to the host frame delta.
    pub time_scale: f32,
    /// Host frames seen, paused or not.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: TIME_SCALE_NORMAL,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Whether gameplay time is currently frozen.
    pub fn is_halted(&self) -> bool {
        self.time_scale == TIME_SCALE_HALTED
    }
}
