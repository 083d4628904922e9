//! ECS systems.
//!
//! - [`audio`] – forwarding commands to and replies from the audio thread
//! - [`session`] – the session driver and pause controller
//! - [`time`] – per-frame clock update
//! - [`ttl`] – delayed despawn of entities
pub mod audio;
pub mod session;
pub mod time;
pub mod ttl;
