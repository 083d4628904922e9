//! Per-frame clock advance.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the session clock by one host frame of `dt` unscaled seconds.
///
/// `delta` and `elapsed` receive `dt * time_scale`; `frame_count` advances
/// even while the session is paused. Inserts a default clock if the world
/// has none yet.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut clock = world.get_resource_or_insert_with(WorldTime::default);
    clock.delta = dt * clock.time_scale;
    clock.elapsed += clock.delta;
    clock.frame_count += 1;
}
