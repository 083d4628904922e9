//! Audio resources: the session's music channel and the bridge to the
//! background audio thread.
//!
//! [`MusicChannel`] is the single reusable playback channel the session
//! drives. It only tracks what should be playing; every state change yields
//! an [`AudioCmd`] that systems write into the ECS message queue. The host
//! either consumes those messages itself or calls [`setup_audio`] to forward
//! them to a background thread (see [`crate::systems::audio`]).

use crate::components::mapposition::MapPosition;
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::clipstore::{AudioClip, ClipStore};
use crate::systems::audio::audio_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Playback status of the [`MusicChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The one music channel owned by the session.
///
/// Operations are idempotent: pausing a paused channel or stopping a stopped
/// one yields no command.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MusicChannel {
    clip: Option<String>,
    looped: bool,
    status: ChannelStatus,
}

impl MusicChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    /// Bind `clip` to the channel with looping enabled. Does not start it.
    pub fn bind_and_loop(&mut self, clip: impl Into<String>) {
        self.clip = Some(clip.into());
        self.looped = true;
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    /// Start the bound clip from the beginning.
    pub fn play(&mut self) -> Option<AudioCmd> {
        let id = self.clip.clone()?;
        self.status = ChannelStatus::Playing;
        Some(AudioCmd::PlayMusic {
            id,
            looped: self.looped,
        })
    }

    pub fn pause(&mut self) -> Option<AudioCmd> {
        if self.status != ChannelStatus::Playing {
            return None;
        }
        self.status = ChannelStatus::Paused;
        self.clip.clone().map(|id| AudioCmd::PauseMusic { id })
    }

    pub fn resume(&mut self) -> Option<AudioCmd> {
        if self.status != ChannelStatus::Paused {
            return None;
        }
        self.status = ChannelStatus::Playing;
        self.clip.clone().map(|id| AudioCmd::ResumeMusic { id })
    }

    pub fn stop(&mut self) -> Option<AudioCmd> {
        if self.status == ChannelStatus::Stopped {
            return None;
        }
        self.status = ChannelStatus::Stopped;
        self.clip.clone().map(|id| AudioCmd::StopMusic { id })
    }
}

/// Build the command for a one-shot clip at `at` and report how long it plays.
pub fn play_one_shot_at(id: &str, clip: &AudioClip, at: MapPosition) -> (AudioCmd, f32) {
    (
        AudioCmd::PlayFxAt {
            id: id.to_string(),
            x: at.x,
            y: at.y,
        },
        clip.length,
    )
}

/// Channels to the background audio device, present only while one runs.
///
/// Inserted by [`setup_audio`] and removed by [`shutdown_audio`].
#[derive(Resource)]
pub struct AudioBridge {
    /// Commands forwarded from the session.
    pub tx_cmd: Sender<AudioCmd>,
    /// Replies from the device.
    pub rx_msg: Receiver<AudioMessage>,
    pub handle: std::thread::JoinHandle<()>,
}

/// Start the audio device thread and insert its [`AudioBridge`].
///
/// The thread gets its own copy of the clip catalogue so it can reject
/// unknown clip ids.
pub fn setup_audio(world: &mut World) {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
    let clips = world
        .get_resource::<ClipStore>()
        .cloned()
        .unwrap_or_default();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg, clips));

    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    world.init_resource::<Messages<AudioMessage>>();
    world.init_resource::<Messages<AudioCmd>>();
}

/// Stop the audio device thread, if any, and wait for it to exit.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}
