//! Audio systems and the background audio thread.
//!
//! - [`forward_audio_cmds`] sends the frame's [`AudioCmd`] messages to the
//!   audio thread when an [`AudioBridge`] is installed.
//! - [`poll_audio_messages`] non-blockingly drains the thread's replies into
//!   the ECS message queue.
//! - [`update_bevy_audio_cmds`] / [`update_bevy_audio_messages`] advance the
//!   double-buffered queues once per frame.
//! - [`audio_thread`] owns the playback device and executes commands.
//!
//! Worlds without a bridge (tests, hosts that mix audio themselves) simply
//! read `Messages<AudioCmd>` directly; the forwarding systems are no-ops.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use crate::resources::clipstore::ClipStore;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

/// Drain any pending replies from the audio thread into
/// `Messages<AudioMessage>`.
pub fn poll_audio_messages(
    bridge: Option<Res<AudioBridge>>,
    mut writer: MessageWriter<AudioMessage>,
) {
    let Some(bridge) = bridge else {
        return;
    };
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Swap the [`AudioMessage`] buffers.
pub fn update_bevy_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}

/// Hand this frame's session audio commands to the device thread, if one runs.
pub fn forward_audio_cmds(bridge: Option<Res<AudioBridge>>, mut reader: MessageReader<AudioCmd>) {
    let Some(bridge) = bridge else {
        return;
    };
    for cmd in reader.read() {
        // ignore send error on shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Swap the [`AudioCmd`] buffers once all readers of the frame have run.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Log replies from the audio device.
pub fn log_audio_messages(mut reader: MessageReader<AudioMessage>) {
    for msg in reader.read() {
        match msg {
            AudioMessage::PlaybackFailed { id, error } => {
                warn!("[audio] playback failed id='{}': {}", id, error)
            }
            other => debug!("[audio] {:?}", other),
        }
    }
}

/// Entry point of the dedicated audio thread.
///
/// Owns the playback state for the single music channel and answers every
/// command with an [`AudioMessage`]. Commands naming a clip missing from
/// `clips` are answered with [`AudioMessage::PlaybackFailed`].
///
/// Blocks until it receives [`AudioCmd::Shutdown`] or every sender is gone.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>, clips: ClipStore) {
    info!(
        "[audio] thread starting (id={:?}, {} clip(s))",
        std::thread::current().id(),
        clips.len()
    );

    let mut current: Option<String> = None;

    for cmd in rx_cmd.iter() {
        let reply = match cmd {
            AudioCmd::Shutdown => {
                info!("[audio] shutdown requested");
                break;
            }
            AudioCmd::PlayMusic { id, looped } => match clips.get(&id) {
                Some(clip) => {
                    debug!("[audio] play '{}' ({}) looped={}", id, clip.path, looped);
                    current = Some(id.clone());
                    AudioMessage::MusicPlayStarted { id }
                }
                None => unknown_clip(id),
            },
            AudioCmd::PauseMusic { id } => {
                if current.as_deref() == Some(id.as_str()) {
                    AudioMessage::MusicPaused { id }
                } else {
                    not_current(id)
                }
            }
            AudioCmd::ResumeMusic { id } => {
                if current.as_deref() == Some(id.as_str()) {
                    AudioMessage::MusicResumed { id }
                } else {
                    not_current(id)
                }
            }
            AudioCmd::StopMusic { id } => {
                if current.as_deref() == Some(id.as_str()) {
                    current = None;
                    AudioMessage::MusicStopped { id }
                } else {
                    not_current(id)
                }
            }
            AudioCmd::PlayFxAt { id, x, y } => match clips.get(&id) {
                Some(clip) => {
                    debug!("[audio] fx '{}' at ({}, {})", id, x, y);
                    AudioMessage::FxPlayed {
                        length: clip.length,
                        id,
                    }
                }
                None => unknown_clip(id),
            },
        };
        if tx_msg.send(reply).is_err() {
            break;
        }
    }

    info!(
        "[audio] thread exiting (id={:?})",
        std::thread::current().id()
    );
}

fn unknown_clip(id: String) -> AudioMessage {
    AudioMessage::PlaybackFailed {
        id,
        error: "unknown clip".to_string(),
    }
}

fn not_current(id: String) -> AudioMessage {
    AudioMessage::PlaybackFailed {
        id,
        error: "not the current music".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::clipstore::AudioClip;
    use crossbeam_channel::unbounded;

    fn spawn_thread() -> (
        Sender<AudioCmd>,
        Receiver<AudioMessage>,
        std::thread::JoinHandle<()>,
    ) {
        let mut clips = ClipStore::new();
        clips.insert(
            "bgm",
            AudioClip {
                path: "bgm.ogg".into(),
                length: 90.0,
            },
        );
        clips.insert(
            "win",
            AudioClip {
                path: "win.ogg".into(),
                length: 2.0,
            },
        );
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg, clips));
        (tx_cmd, rx_msg, handle)
    }

    #[test]
    fn test_thread_answers_and_shuts_down() {
        let (tx, rx, handle) = spawn_thread();
        tx.send(AudioCmd::PlayMusic {
            id: "bgm".into(),
            looped: true,
        })
        .unwrap();
        tx.send(AudioCmd::PauseMusic { id: "bgm".into() }).unwrap();
        tx.send(AudioCmd::PlayFxAt {
            id: "win".into(),
            x: 0.0,
            y: 0.0,
        })
        .unwrap();
        tx.send(AudioCmd::Shutdown).unwrap();
        handle.join().unwrap();

        let replies: Vec<AudioMessage> = rx.try_iter().collect();
        assert_eq!(
            replies,
            vec![
                AudioMessage::MusicPlayStarted { id: "bgm".into() },
                AudioMessage::MusicPaused { id: "bgm".into() },
                AudioMessage::FxPlayed {
                    id: "win".into(),
                    length: 2.0
                },
            ]
        );
    }

    #[test]
    fn test_thread_rejects_unknown_clip() {
        let (tx, rx, handle) = spawn_thread();
        tx.send(AudioCmd::PlayMusic {
            id: "nope".into(),
            looped: false,
        })
        .unwrap();
        drop(tx);
        handle.join().unwrap();

        let replies: Vec<AudioMessage> = rx.try_iter().collect();
        assert!(matches!(
            replies.as_slice(),
            [AudioMessage::PlaybackFailed { id, .. }] if id == "nope"
        ));
    }
}
