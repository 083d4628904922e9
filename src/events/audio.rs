use bevy_ecs::message::Message;

/// Commands sent *to* the audio device.
///
/// The session never touches the device directly: the
/// [`MusicChannel`](crate::resources::audio::MusicChannel) writes these and
/// the host (or the audio thread behind
/// [`AudioBridge`](crate::resources::audio::AudioBridge)) executes them.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    PlayMusic { id: String, looped: bool },
    PauseMusic { id: String },
    ResumeMusic { id: String },
    StopMusic { id: String },
    /// One-shot sound at a world position.
    PlayFxAt { id: String, x: f32, y: f32 },
    Shutdown,
}

/// Events sent *back* from the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    MusicPlayStarted { id: String },
    MusicPaused { id: String },
    MusicResumed { id: String },
    MusicStopped { id: String },
    FxPlayed { id: String, length: f32 },
    PlaybackFailed { id: String, error: String },
}
