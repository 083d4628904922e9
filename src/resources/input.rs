//! Per-frame input resource.
//!
//! Only the pause toggle matters to the session. The host feeds the raw key
//! state once per frame through [`InputState::update_pause_toggle`]; edges
//! are derived from the previous frame.
//!
//! Platforms without a keyboard simply do not insert [`InputState`]; the
//! session then only pauses through external requests.
use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean key state with derived edges.
pub struct BoolState {
    /// Key held down.
    pub active: bool,
    /// Went down this frame.
    pub just_pressed: bool,
    /// Went up this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Record this frame's key state and derive the edges.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

/// Resource capturing the per-frame input relevant to the session.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub pause_toggle: BoolState,
}

impl InputState {
    pub fn update_pause_toggle(&mut self, down: bool) {
        self.pause_toggle.update(down);
    }
}
