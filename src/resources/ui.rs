//! UI surface resource.
//!
//! The session does not render anything. It records which panels should be
//! visible and what the labels should read; the host's UI layer mirrors
//! [`UiSurface`] every frame.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

/// Panel shown while the session is paused.
pub const PAUSED_PANEL: &str = "PausedPanel";
/// Panel shown once the session has a result.
pub const GAME_RESULT_PANEL: &str = "GameResultPanel";
/// Label inside [`GAME_RESULT_PANEL`] carrying the win/lose message.
pub const GAME_RESULT_TEXT: &str = "GameResultText";

/// Desired visibility of panels and contents of labels.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct UiSurface {
    pub panels: FxHashMap<String, bool>,
    pub labels: FxHashMap<String, String>,
}

impl UiSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visible(&mut self, panel: impl Into<String>, visible: bool) {
        self.panels.insert(panel.into(), visible);
    }

    /// Panels never mentioned count as hidden.
    pub fn is_visible(&self, panel: &str) -> bool {
        self.panels.get(panel).copied().unwrap_or(false)
    }

    pub fn set_text(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.labels.insert(label.into(), text.into());
    }

    pub fn text(&self, label: &str) -> Option<&str> {
        self.labels.get(label).map(String::as_str)
    }
}
