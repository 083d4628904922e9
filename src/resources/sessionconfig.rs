//! Session configuration resource.
//!
//! Holds the scene names, result texts and audio clip references the session
//! needs. Values are read from an INI file; anything missing keeps its safe
//! default. Clip references point into the
//! [`ClipStore`](crate::resources::clipstore::ClipStore), which is read from
//! the `[clip.*]` sections of the same file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [session]
//! game_scene = GameScene
//! menu_scene = GameMenuScene
//! win_text = You Win!!!
//! lose_text = You Lose!!!
//! pause_input = true
//! anchor_x = 0.0
//! anchor_y = 0.0
//!
//! [audio]
//! background_music = bgm
//! win_clip = win
//! lose_clip = lose
//! ```
//!
//! Keys, section names and clip ids are case-sensitive, so a clip id matches
//! its `[clip.<id>]` section exactly.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::mapposition::MapPosition;
use crate::error::ConfigError;

const DEFAULT_GAME_SCENE: &str = "GameScene";
const DEFAULT_MENU_SCENE: &str = "GameMenuScene";
const DEFAULT_WIN_TEXT: &str = "You Win!!!";
const DEFAULT_LOSE_TEXT: &str = "You Lose!!!";
const DEFAULT_PAUSE_INPUT: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./session.ini";

/// Session configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Scene that hosts a play session.
    pub game_scene: String,
    /// Scene loaded by "return to menu".
    pub menu_scene: String,
    /// Result text shown after a win.
    pub win_text: String,
    /// Result text shown after a loss.
    pub lose_text: String,
    /// Whether this platform offers the pause-toggle input.
    pub pause_input: bool,
    /// World position the result stinger is played at.
    pub anchor: MapPosition,
    /// Clip id looped while the session runs.
    pub background_music: Option<String>,
    /// Clip id played once after a win.
    pub win_clip: Option<String>,
    /// Clip id played once after a loss.
    pub lose_clip: Option<String>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Create a configuration with safe defaults and no audio clips.
    pub fn new() -> Self {
        Self {
            game_scene: DEFAULT_GAME_SCENE.to_string(),
            menu_scene: DEFAULT_MENU_SCENE.to_string(),
            win_text: DEFAULT_WIN_TEXT.to_string(),
            lose_text: DEFAULT_LOSE_TEXT.to_string(),
            pause_input: DEFAULT_PAUSE_INPUT,
            anchor: MapPosition::default(),
            background_music: None,
            win_clip: None,
            lose_clip: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file at `config_path`.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new_cs();
        config.load(&self.config_path).map_err(ConfigError::Load)?;
        self.apply(&config)
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new_cs();
        config.read(text.to_string()).map_err(ConfigError::Load)?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), ConfigError> {
        // [session] section
        if let Some(scene) = non_empty(config.get("session", "game_scene")) {
            self.game_scene = scene;
        }
        if let Some(scene) = non_empty(config.get("session", "menu_scene")) {
            self.menu_scene = scene;
        }
        if let Some(text) = non_empty(config.get("session", "win_text")) {
            self.win_text = text;
        }
        if let Some(text) = non_empty(config.get("session", "lose_text")) {
            self.lose_text = text;
        }
        if let Some(enabled) = config
            .getbool("session", "pause_input")
            .map_err(|reason| invalid("session", "pause_input", reason))?
        {
            self.pause_input = enabled;
        }
        if let Some(x) = get_coord(config, "anchor_x")? {
            self.anchor.x = x;
        }
        if let Some(y) = get_coord(config, "anchor_y")? {
            self.anchor.y = y;
        }

        // [audio] section
        if let Some(id) = non_empty(config.get("audio", "background_music")) {
            self.background_music = Some(id);
        }
        if let Some(id) = non_empty(config.get("audio", "win_clip")) {
            self.win_clip = Some(id);
        }
        if let Some(id) = non_empty(config.get("audio", "lose_clip")) {
            self.lose_clip = Some(id);
        }

        info!(
            "Loaded session config: scenes game='{}' menu='{}', music={:?}, win={:?}, lose={:?}, pause_input={}",
            self.game_scene,
            self.menu_scene,
            self.background_music,
            self.win_clip,
            self.lose_clip,
            self.pause_input
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist. Unset clip references are left
    /// out.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new_cs();

        config.set("session", "game_scene", Some(self.game_scene.clone()));
        config.set("session", "menu_scene", Some(self.menu_scene.clone()));
        config.set("session", "win_text", Some(self.win_text.clone()));
        config.set("session", "lose_text", Some(self.lose_text.clone()));
        config.set("session", "pause_input", Some(self.pause_input.to_string()));
        config.set("session", "anchor_x", Some(self.anchor.x.to_string()));
        config.set("session", "anchor_y", Some(self.anchor.y.to_string()));

        if let Some(id) = &self.background_music {
            config.set("audio", "background_music", Some(id.clone()));
        }
        if let Some(id) = &self.win_clip {
            config.set("audio", "win_clip", Some(id.clone()));
        }
        if let Some(id) = &self.lose_clip {
            config.set("audio", "lose_clip", Some(id.clone()));
        }

        config.write(&self.config_path)?;

        info!("Saved session config to {:?}", self.config_path);

        Ok(())
    }

    /// Result text for the given outcome.
    pub fn result_text(&self, win: bool) -> &str {
        if win { &self.win_text } else { &self.lose_text }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn get_coord(config: &Ini, key: &str) -> Result<Option<f32>, ConfigError> {
    match config
        .getfloat("session", key)
        .map_err(|reason| invalid("session", key, reason))?
    {
        Some(v) if v.is_finite() => Ok(Some(v as f32)),
        Some(v) => Err(invalid("session", key, format!("not a finite number: {v}"))),
        None => Ok(None),
    }
}

fn invalid(section: &str, key: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_no_clips() {
        let config = SessionConfig::new();
        assert_eq!(config.game_scene, "GameScene");
        assert_eq!(config.menu_scene, "GameMenuScene");
        assert_eq!(config.result_text(true), "You Win!!!");
        assert_eq!(config.result_text(false), "You Lose!!!");
        assert!(config.pause_input);
        assert!(config.background_music.is_none());
        assert!(config.win_clip.is_none());
        assert!(config.lose_clip.is_none());
    }

    #[test]
    fn test_load_from_str_overrides_present_keys() {
        let mut config = SessionConfig::new();
        config
            .load_from_str(
                "[session]\nmenu_scene = Title\npause_input = false\n\n[audio]\nbackground_music = bgm\nwin_clip = fanfare\n",
            )
            .unwrap();

        assert_eq!(config.menu_scene, "Title");
        assert_eq!(config.game_scene, "GameScene");
        assert!(!config.pause_input);
        assert_eq!(config.background_music.as_deref(), Some("bgm"));
        assert_eq!(config.win_clip.as_deref(), Some("fanfare"));
        assert!(config.lose_clip.is_none());
    }

    #[test]
    fn test_empty_clip_reference_stays_unset() {
        let mut config = SessionConfig::new();
        config
            .load_from_str("[audio]\nlose_clip =\n")
            .unwrap();
        assert!(config.lose_clip.is_none());
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        let mut config = SessionConfig::new();
        let err = config
            .load_from_str("[session]\npause_input = maybe\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_anchor_is_read_from_session_section() {
        let mut config = SessionConfig::new();
        config
            .load_from_str("[session]\nanchor_x = 12.5\nanchor_y = -4\n")
            .unwrap();
        assert_eq!(config.anchor, MapPosition::new(12.5, -4.0));
    }

    #[test]
    fn test_clip_ids_keep_their_case() {
        let mut config = SessionConfig::new();
        config.load_from_str("[audio]\nwin_clip = Win\n").unwrap();
        assert_eq!(config.win_clip.as_deref(), Some("Win"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = SessionConfig::with_path("/nonexistent/session.ini");
        assert!(matches!(
            config.load_from_file(),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_save_then_load_keeps_clip_references() {
        let path = std::env::temp_dir().join(format!(
            "arcadesession-config-{}.ini",
            std::process::id()
        ));
        let mut saved = SessionConfig::with_path(&path);
        saved.background_music = Some("bgm".into());
        saved.lose_clip = Some("sad".into());
        saved.anchor = MapPosition::new(3.0, 7.5);
        saved.save_to_file().unwrap();

        let mut loaded = SessionConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, saved);
    }
}
