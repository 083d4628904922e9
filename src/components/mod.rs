//! ECS components for entities.
//!
//! The session core only needs a handful of components:
//! - [`generator`] – marker for the root entity of all gameplay generators
//! - [`mapposition`] – world-space position used as a sound emitter point
//! - [`ttl`] – countdown that despawns an entity when it reaches zero

pub mod generator;
pub mod mapposition;
pub mod ttl;
