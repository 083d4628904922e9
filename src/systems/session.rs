//! Session state machine and pause controller.
//!
//! The session runs as a cooperative driver that is resumed once per frame:
//!
//! 1. `run_init` once, as soon as the environment starts the session
//! 2. wait while the phase is still `Init`
//! 3. `run_start` once
//! 4. `run_frame_tick` every frame while the phase is `Running`
//! 5. `run_end` once after the phase left `Running`
//!
//! The resume point lives in [`SessionState::driver`], so the driver holds no
//! state of its own between frames. [`environment_start_system`] arms the
//! driver and [`session_driver_system`] resumes it every frame.
//!
//! Everything the session touches is bundled in [`SessionContext`], which is
//! shared with the request observer in [`crate::events::session`].

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use log::{debug, error, info, warn};

use crate::components::generator::GeneratorRoot;
use crate::components::ttl::Ttl;
use crate::error::SessionError;
use crate::events::audio::AudioCmd;
use crate::events::environment::EnvironmentCmd;
use crate::events::session::SessionPhaseChanged;
use crate::resources::audio::{MusicChannel, play_one_shot_at};
use crate::resources::clipstore::{AudioClip, ClipStore};
use crate::resources::collaborators::Collaborators;
use crate::resources::input::InputState;
use crate::resources::session::{DriverStep, SessionPhase, SessionState};
use crate::resources::sessionconfig::SessionConfig;
use crate::resources::ui::{GAME_RESULT_PANEL, GAME_RESULT_TEXT, PAUSED_PANEL, UiSurface};
use crate::resources::worldtime::{TIME_SCALE_HALTED, TIME_SCALE_NORMAL, WorldTime};

/// Bundled system parameters for everything the session drives.
#[derive(SystemParam)]
pub struct SessionContext<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub session: ResMut<'w, SessionState>,
    pub config: Res<'w, SessionConfig>,
    pub clips: Res<'w, ClipStore>,
    pub collaborators: ResMut<'w, Collaborators>,
    pub music: ResMut<'w, MusicChannel>,
    pub audio_cmds: MessageWriter<'w, AudioCmd>,
    pub ui: ResMut<'w, UiSurface>,
    pub world_time: ResMut<'w, WorldTime>,
    /// Absent on platforms without a pause key.
    pub input: Option<Res<'w, InputState>>,
    pub environment_cmds: MessageWriter<'w, EnvironmentCmd>,
    pub generators: Query<'w, 's, Entity, With<GeneratorRoot>>,
}

/// Arm the session driver when the environment becomes active.
pub fn environment_start_system(mut ctx: SessionContext) {
    ctx.on_environment_start();
}

/// Resume the session driver for this frame.
pub fn session_driver_system(mut ctx: SessionContext) {
    ctx.drive();
}

fn resolve_clip<'a>(
    clips: &'a ClipStore,
    id: Option<&str>,
    asset: &'static str,
) -> Result<(&'a str, &'a AudioClip), SessionError> {
    clips
        .resolve(id)
        .ok_or(SessionError::MissingConfigurationAsset { asset })
}

impl SessionContext<'_, '_> {
    /// Reset the session flags and run the driver up to its first suspension.
    ///
    /// Calling this again for a session that already started is ignored.
    pub fn on_environment_start(&mut self) {
        if self.session.is_started() {
            warn!(
                "Session already started (driver at {:?}); ignoring environment start",
                self.session.driver()
            );
            return;
        }
        self.session.set_paused(false);
        self.session.set_phase(SessionPhase::Init);
        self.session.set_driver(DriverStep::Initializing);
        info!("Session environment started");
        self.drive();
    }

    /// Resume the driver until it has to wait for the next frame.
    pub fn drive(&mut self) {
        loop {
            match self.session.driver() {
                DriverStep::Dormant | DriverStep::Finished => return,
                DriverStep::Initializing => {
                    self.run_init();
                    self.session.set_driver(DriverStep::WaitingForStart);
                }
                DriverStep::WaitingForStart => {
                    if self.session.phase() == SessionPhase::Init {
                        return;
                    }
                    self.run_start();
                    self.session.set_driver(DriverStep::Polling);
                }
                DriverStep::Polling => {
                    if self.session.phase() == SessionPhase::Running {
                        self.run_frame_tick();
                        return;
                    }
                    self.run_end();
                    self.session.set_driver(DriverStep::Finished);
                    return;
                }
            }
        }
    }

    fn transition(&mut self, to: SessionPhase) {
        let from = self.session.set_phase(to);
        if from == to {
            return;
        }
        debug!("Session phase {:?} -> {:?}", from, to);
        self.commands.trigger(SessionPhaseChanged { from, to });
    }

    /// Initialize both collaborators, hide both panels, enter `Start`.
    pub fn run_init(&mut self) {
        self.collaborators.init_all();
        self.ui.set_visible(PAUSED_PANEL, false);
        self.ui.set_visible(GAME_RESULT_PANEL, false);
        self.transition(SessionPhase::Start);
    }

    /// Start the looping background music if configured, enter `Running`.
    pub fn run_start(&mut self) {
        match resolve_clip(
            &self.clips,
            self.config.background_music.as_deref(),
            "BackgroundMusic",
        ) {
            Ok((id, _)) => {
                self.music.bind_and_loop(id);
                if let Some(cmd) = self.music.play() {
                    self.audio_cmds.write(cmd);
                }
            }
            Err(err) => error!("{err}"),
        }
        self.transition(SessionPhase::Running);
    }

    /// Toggle pause on a pause-key press.
    pub fn run_frame_tick(&mut self) {
        let toggled = self
            .input
            .as_ref()
            .is_some_and(|input| input.pause_toggle.just_pressed);
        if !toggled {
            return;
        }
        if self.session.is_paused() {
            self.continue_session();
        } else {
            self.pause();
        }
    }

    /// Stop the music and collaborators, play the result stinger, show the
    /// result and schedule the generators for destruction.
    pub fn run_end(&mut self) {
        if let Some(cmd) = self.music.stop() {
            self.audio_cmds.write(cmd);
        }
        self.music.set_looped(false);

        self.collaborators.stop_all();

        // no declared result counts as a loss
        let win = self.session.result().unwrap_or(false);
        let (clip_id, asset) = if win {
            (self.config.win_clip.as_deref(), "GameWinClip")
        } else {
            (self.config.lose_clip.as_deref(), "GameLoseClip")
        };
        let delay = match resolve_clip(&self.clips, clip_id, asset) {
            Ok((id, clip)) => {
                let (cmd, length) = play_one_shot_at(id, clip, self.session.anchor);
                self.audio_cmds.write(cmd);
                length
            }
            Err(err) => {
                error!("{err}");
                0.0
            }
        };

        let text = self.config.result_text(win).to_string();
        info!("Session ended: {}", text);
        self.ui.set_text(GAME_RESULT_TEXT, text);
        self.ui.set_visible(GAME_RESULT_PANEL, true);

        self.destroy_generators_after(delay);
    }

    fn destroy_generators_after(&mut self, delay: f32) {
        let mut scheduled = 0;
        for root in self.generators.iter() {
            debug!("Generator root {:?} destroyed in {}s", root, delay);
            self.commands.entity(root).insert(Ttl::new(delay));
            scheduled += 1;
        }
        if scheduled == 0 {
            warn!("No generator root to destroy");
        }
    }

    /// Halt gameplay time and music, show the pause panel.
    pub fn pause(&mut self) {
        if let Some(cmd) = self.music.pause() {
            self.audio_cmds.write(cmd);
        }
        self.world_time.time_scale = TIME_SCALE_HALTED;
        self.session.set_paused(true);
        self.ui.set_visible(PAUSED_PANEL, true);
        info!("Session paused");
    }

    /// Restore gameplay time and music, hide the pause panel.
    pub fn continue_session(&mut self) {
        self.world_time.time_scale = TIME_SCALE_NORMAL;
        if let Some(cmd) = self.music.resume() {
            self.audio_cmds.write(cmd);
        }
        self.session.set_paused(false);
        self.ui.set_visible(PAUSED_PANEL, false);
        info!("Session continued");
    }

    /// Record the outcome and end the session.
    ///
    /// Repeated calls overwrite the result; `End` is terminal so the phase
    /// does not change again.
    pub fn declare_result(&mut self, result: bool) {
        if let Some(previous) = self.session.result() {
            warn!("Session result re-declared: {} -> {}", previous, result);
        }
        self.session.set_result(result);
        self.transition(SessionPhase::End);
    }

    /// Ask the host to rebuild the current scene from scratch.
    pub fn restart_session(&mut self) {
        info!("Session restart requested");
        self.environment_cmds.write(EnvironmentCmd::ReloadCurrent);
    }

    /// Reset the clock and ask the host to load the menu scene.
    pub fn return_to_menu(&mut self) {
        self.world_time.time_scale = TIME_SCALE_NORMAL;
        info!("Returning to menu '{}'", self.config.menu_scene);
        self.environment_cmds.write(EnvironmentCmd::Load {
            scene: self.config.menu_scene.clone(),
        });
    }
}
