//! Audio clip catalogue.
//!
//! The session refers to clips by id; [`ClipStore`] maps each id to the file
//! the host should play and the clip length in seconds. The length is what
//! the end-of-session sequence waits for before tearing down the generators.
//!
//! Clips are declared in the session INI file, one section per clip:
//!
//! ```ini
//! [clip.win]
//! path = assets/audio/win.ogg
//! length = 2.5
//! ```
//!
//! Section names keep their case: `[clip.Win]` declares the id `Win`.

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use log::{debug, info};
use rustc_hash::FxHashMap;
use std::path::Path;

use crate::error::ConfigError;

const CLIP_SECTION_PREFIX: &str = "clip.";

/// A playable clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub path: String,
    /// Duration in seconds.
    pub length: f32,
}

/// Map of clip ids to clip descriptions.
#[derive(Resource, Debug, Clone, Default)]
pub struct ClipStore {
    pub map: FxHashMap<String, AudioClip>,
}

impl ClipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        ClipStore {
            map: FxHashMap::default(),
        }
    }

    /// Insert a clip under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, clip: AudioClip) {
        self.map.insert(id.into(), clip);
    }

    /// Retrieve a clip by id, if present.
    pub fn get(&self, id: impl AsRef<str>) -> Option<&AudioClip> {
        self.map.get(id.as_ref())
    }

    /// Resolve an optional clip reference from the configuration.
    pub fn resolve(&self, id: Option<&str>) -> Option<(&str, &AudioClip)> {
        let id = id?;
        self.map.get_key_value(id).map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Read every `[clip.<id>]` section of the INI file at `path`.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Ini::new_cs();
        config.load(path.as_ref()).map_err(ConfigError::Load)?;
        Self::from_ini(&config)
    }

    /// Read every `[clip.<id>]` section of INI text.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let mut config = Ini::new_cs();
        config.read(text.to_string()).map_err(ConfigError::Load)?;
        Self::from_ini(&config)
    }

    fn from_ini(config: &Ini) -> Result<Self, ConfigError> {
        let mut store = ClipStore::new();
        for section in config.sections() {
            let Some(id) = section.strip_prefix(CLIP_SECTION_PREFIX) else {
                continue;
            };
            let path = config
                .get(&section, "path")
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| ConfigError::InvalidValue {
                    section: section.clone(),
                    key: "path".to_string(),
                    reason: "missing".to_string(),
                })?;
            let length = config
                .getfloat(&section, "length")
                .map_err(|reason| ConfigError::InvalidValue {
                    section: section.clone(),
                    key: "length".to_string(),
                    reason,
                })?
                .unwrap_or(0.0);
            if !length.is_finite() || length < 0.0 {
                return Err(ConfigError::InvalidValue {
                    section,
                    key: "length".to_string(),
                    reason: format!("expected a finite, non-negative length, got {length}"),
                });
            }
            debug!("clip '{}' -> '{}' ({}s)", id, path, length);
            store.insert(
                id,
                AudioClip {
                    path: path.trim().to_string(),
                    length: length as f32,
                },
            );
        }
        info!("Loaded {} audio clip(s)", store.len());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIPS: &str = "\
[session]
menu_scene = Title

[clip.bgm]
path = assets/audio/bgm.ogg
length = 92.5

[clip.win]
path = assets/audio/win.ogg
length = 2.5
";

    #[test]
    fn test_loads_only_clip_sections() {
        let store = ClipStore::load_from_str(CLIPS).unwrap();
        assert_eq!(store.len(), 2);
        let win = store.get("win").unwrap();
        assert_eq!(win.path, "assets/audio/win.ogg");
        assert_eq!(win.length, 2.5);
        assert!(store.get("session").is_none());
    }

    #[test]
    fn test_resolve_unset_or_unknown_is_none() {
        let store = ClipStore::load_from_str(CLIPS).unwrap();
        assert!(store.resolve(None).is_none());
        assert!(store.resolve(Some("lose")).is_none());
        let (id, clip) = store.resolve(Some("bgm")).unwrap();
        assert_eq!(id, "bgm");
        assert_eq!(clip.length, 92.5);
    }

    #[test]
    fn test_clip_without_path_is_rejected() {
        let err = ClipStore::load_from_str("[clip.oops]\nlength = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "path"));
    }

    #[test]
    fn test_mixed_case_ids_match_the_config() {
        let text = "[audio]\nwin_clip = Win\n\n[clip.Win]\npath = win.wav\nlength = 1.5\n";
        let store = ClipStore::load_from_str(text).unwrap();
        let mut config = crate::resources::sessionconfig::SessionConfig::new();
        config.load_from_str(text).unwrap();

        let (id, clip) = store.resolve(config.win_clip.as_deref()).unwrap();
        assert_eq!(id, "Win");
        assert_eq!(clip.length, 1.5);
        assert!(store.get("win").is_none());
    }

    #[test]
    fn test_non_finite_length_is_rejected() {
        for length in ["inf", "NaN", "-1"] {
            let text = format!("[clip.loop]\npath = loop.wav\nlength = {length}\n");
            let err = ClipStore::load_from_str(&text).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "length"),
                "length = {length} accepted"
            );
        }
    }

    #[test]
    fn test_missing_length_defaults_to_zero() {
        let store = ClipStore::load_from_str("[clip.click]\npath = click.wav\n").unwrap();
        assert_eq!(store.get("click").unwrap().length, 0.0);
    }
}
