use bevy_ecs::prelude::Component;

/// World-space position, used as the emitter point for one-shot sounds.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub x: f32,
    pub y: f32,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        MapPosition { x, y }
    }
}
