//! Despawning of entities whose [`Ttl`] ran out.
//!
//! [`WorldTime::delta`] is already scaled, so a paused session keeps the
//! generator root alive until play resumes.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::ttl::Ttl;
use crate::resources::worldtime::WorldTime;

/// Advance every [`Ttl`] by this frame's delta and despawn the expired ones
/// together with their `ChildOf` descendants.
pub fn ttl_system(
    world_time: Res<WorldTime>,
    mut timed: Query<(Entity, &mut Ttl)>,
    mut commands: Commands,
) {
    for (entity, mut ttl) in timed.iter_mut() {
        if ttl.tick(world_time.delta) {
            debug!("{:?} expired, despawning", entity);
            commands.entity(entity).try_despawn();
        }
    }
}
