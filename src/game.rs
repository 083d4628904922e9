//! Session setup and the headless host environment.
//!
//! - [`session_instance`] is the accessor for the one [`SessionState`] of a
//!   world. It creates the session, its default configuration and its
//!   observers on first access.
//! - [`build_session_world`] wires a complete session world from an explicit
//!   configuration.
//! - [`frame_schedule`] is the per-frame system order.
//! - [`Environment`] plays the host: it owns the world, feeds the clock and
//!   the pause key, runs frames and services [`EnvironmentCmd`]s (scene
//!   reload and scene load).

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::generator::GeneratorRoot;
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::events::environment::EnvironmentCmd;
use crate::events::session::{
    SessionRequest, SessionRequestEvent, log_phase_change_observer, session_request_observer,
};
use crate::resources::audio::{MusicChannel, setup_audio, shutdown_audio};
use crate::resources::clipstore::ClipStore;
use crate::resources::collaborators::Collaborators;
use crate::resources::input::InputState;
use crate::resources::session::SessionState;
use crate::resources::sessionconfig::SessionConfig;
use crate::resources::ui::UiSurface;
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::{
    forward_audio_cmds, log_audio_messages, poll_audio_messages, update_bevy_audio_cmds,
    update_bevy_audio_messages,
};
use crate::systems::session::{environment_start_system, session_driver_system};
use crate::systems::time::update_world_time;
use crate::systems::ttl::ttl_system;

/// Marks a world whose session observers are registered.
#[derive(Resource)]
struct SessionObservers;

/// Return the world's session, creating it on first access.
///
/// Any session resource the world lacks is created with its default value,
/// and the request and logging observers are registered once per world. This
/// also holds for a [`SessionState`] inserted before the first access. Later
/// calls return the same instance.
pub fn session_instance(world: &mut World) -> Mut<'_, SessionState> {
    world.init_resource::<SessionConfig>();
    world.init_resource::<ClipStore>();
    world.init_resource::<Collaborators>();
    world.init_resource::<MusicChannel>();
    world.init_resource::<UiSurface>();
    world.init_resource::<WorldTime>();
    world.init_resource::<Messages<AudioCmd>>();
    world.init_resource::<Messages<AudioMessage>>();
    world.init_resource::<Messages<EnvironmentCmd>>();

    if !world.contains_resource::<SessionObservers>() {
        if world.resource::<SessionConfig>().pause_input {
            world.init_resource::<InputState>();
        }
        world.add_observer(session_request_observer);
        world.add_observer(log_phase_change_observer);
        world.insert_resource(SessionObservers);
    }

    if !world.contains_resource::<SessionState>() {
        info!("No session in the environment, creating one");
        let anchor = world.resource::<SessionConfig>().anchor;
        world.insert_resource(SessionState::new().with_anchor(anchor));
    }
    world.resource_mut::<SessionState>()
}

/// Build a world holding a dormant session wired to `config`, `clips` and
/// `collaborators`, plus an empty generator root.
pub fn build_session_world(
    config: SessionConfig,
    clips: ClipStore,
    collaborators: Collaborators,
) -> World {
    let mut world = World::new();
    world.insert_resource(config);
    world.insert_resource(clips);
    world.insert_resource(collaborators);
    session_instance(&mut world);
    world.spawn(GeneratorRoot);
    world
}

/// Systems run once per frame, in order.
pub fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            session_driver_system,
            ttl_system,
            forward_audio_cmds,
            update_bevy_audio_cmds,
            poll_audio_messages,
            log_audio_messages,
            update_bevy_audio_messages,
        )
            .chain(),
    );
    schedule
}

/// Run `environment_start_system` once on `world`.
pub fn start_session(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(environment_start_system);
    schedule.run(world);
}

type CollaboratorFactory = Box<dyn Fn() -> Collaborators>;

/// Headless host for one scene at a time.
///
/// The game scene (see [`SessionConfig::game_scene`]) gets a full session;
/// every other scene is an empty world with a clock.
pub struct Environment {
    config: SessionConfig,
    clips: ClipStore,
    collaborators: CollaboratorFactory,
    scene: String,
    world: World,
    schedule: Schedule,
    audio_thread: bool,
    pause_key_down: bool,
    loads: u32,
}

impl Environment {
    /// Load the game scene with the stock collaborators.
    pub fn new(config: SessionConfig, clips: ClipStore) -> Self {
        Self::with_collaborators(config, clips, Collaborators::default)
    }

    /// Load the game scene; `collaborators` is called for every (re)load.
    pub fn with_collaborators(
        config: SessionConfig,
        clips: ClipStore,
        collaborators: impl Fn() -> Collaborators + 'static,
    ) -> Self {
        let scene = config.game_scene.clone();
        let mut env = Environment {
            config,
            clips,
            collaborators: Box::new(collaborators),
            scene: String::new(),
            world: World::new(),
            schedule: Schedule::default(),
            audio_thread: false,
            pause_key_down: false,
            loads: 0,
        };
        env.load(&scene);
        env
    }

    /// Forward audio commands to a background audio thread from now on.
    pub fn with_audio_thread(mut self) -> Self {
        self.audio_thread = true;
        if self.is_session_scene() {
            setup_audio(&mut self.world);
        }
        self
    }

    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn is_session_scene(&self) -> bool {
        self.scene == self.config.game_scene
    }

    /// Number of scene loads, the initial one included.
    pub fn loads(&self) -> u32 {
        self.loads
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.world.get_resource::<SessionState>()
    }

    pub fn ui(&self) -> Option<&UiSurface> {
        self.world.get_resource::<UiSurface>()
    }

    pub fn time(&self) -> Option<&WorldTime> {
        self.world.get_resource::<WorldTime>()
    }

    /// Replace the current scene.
    pub fn load(&mut self, scene: &str) {
        shutdown_audio(&mut self.world);
        info!("Loading scene '{}'", scene);
        self.scene = scene.to_string();
        self.pause_key_down = false;
        self.loads += 1;

        if self.is_session_scene() {
            self.world = build_session_world(
                self.config.clone(),
                self.clips.clone(),
                (self.collaborators)(),
            );
            if self.audio_thread {
                setup_audio(&mut self.world);
            }
            self.schedule = frame_schedule();
            start_session(&mut self.world);
        } else {
            self.world = World::new();
            self.world.init_resource::<WorldTime>();
            self.schedule = Schedule::default();
        }
    }

    /// Rebuild the current scene from scratch.
    pub fn reload_current(&mut self) {
        let scene = self.scene.clone();
        self.load(&scene);
    }

    /// Raw pause key state, applied at the start of the next frame.
    pub fn set_pause_key(&mut self, down: bool) {
        self.pause_key_down = down;
    }

    /// Run one host frame of `dt` unscaled seconds.
    pub fn frame(&mut self, dt: f32) {
        if let Some(mut input) = self.world.get_resource_mut::<InputState>() {
            input.update_pause_toggle(self.pause_key_down);
        }
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.service_environment_cmds();
    }

    /// Deliver a request to the session, as a UI button or gameplay rule would.
    pub fn request(&mut self, request: SessionRequest) {
        if !self.world.contains_resource::<SessionState>() {
            warn!(
                "Scene '{}' has no session; dropping {:?}",
                self.scene, request
            );
            return;
        }
        self.world.trigger(SessionRequestEvent::new(request));
        self.service_environment_cmds();
    }

    fn service_environment_cmds(&mut self) {
        let Some(mut msgs) = self.world.get_resource_mut::<Messages<EnvironmentCmd>>() else {
            return;
        };
        let cmds: Vec<EnvironmentCmd> = msgs.drain().collect();
        for cmd in cmds {
            match cmd {
                EnvironmentCmd::ReloadCurrent => self.reload_current(),
                EnvironmentCmd::Load { scene } => self.load(&scene),
            }
        }
    }

    /// Stop the audio thread, if any.
    pub fn shutdown(&mut self) {
        shutdown_audio(&mut self.world);
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        self.shutdown();
    }
}
