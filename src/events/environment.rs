//! Requests addressed to the host environment.
//!
//! The session cannot reload or switch scenes itself; it writes an
//! [`EnvironmentCmd`] and the host services it after the frame finishes.
//! See [`crate::game::Environment::frame`].

use bevy_ecs::message::Message;

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentCmd {
    /// Rebuild the active scene from scratch, discarding the current session.
    ReloadCurrent,
    /// Replace the active scene with the named one.
    Load { scene: String },
}
