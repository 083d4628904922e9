//! Marker for the container of gameplay spawners.
//!
//! Every spawner that produces gameplay objects (bombs, pickups, ...) is
//! parented under a single entity tagged with [`GeneratorRoot`]. When the
//! session ends, the root receives a [`Ttl`](crate::components::ttl::Ttl)
//! so the whole subtree goes away once the result stinger has played.

use bevy_ecs::prelude::Component;

/// Tag for the root entity that parents all gameplay generators.
#[derive(Component, Clone, Debug, Default)]
pub struct GeneratorRoot;
