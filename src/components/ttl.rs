//! Delayed destruction.
//!
//! An entity carrying [`Ttl`] is despawned, children included, by
//! [`ttl_system`](crate::systems::ttl::ttl_system) once its countdown runs
//! out. At session end the generator root gets one sized to the result
//! stinger, so gameplay keeps going until the sound has finished.
//!
//! A zero delay means "on the next TTL pass".

use bevy_ecs::prelude::Component;

/// Seconds left before the entity is despawned.
///
/// Counted in scaled time, so it stalls while the session is paused.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ttl {
    pub remaining: f32,
}

impl Ttl {
    /// Negative delays are clamped to zero.
    pub fn new(seconds: f32) -> Self {
        Ttl {
            remaining: seconds.max(0.0),
        }
    }

    /// Consume `dt` seconds; `true` once the countdown has expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}
