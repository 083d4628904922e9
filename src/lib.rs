//! Arcade session library.
//!
//! Run-state controller for a single play session: it sequences the session
//! from initialization to a win/lose result, handles pause and resume, and
//! starts and stops the scoring and hazard trackers alongside it.
//!
//! Everything lives in a `bevy_ecs` world. See [`game`] for wiring a world
//! and for the headless [`game::Environment`] host.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
