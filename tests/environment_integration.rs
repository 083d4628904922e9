//! Host environment integration tests: the headless `Environment` running
//! frames, servicing scene reloads and loads, and the lazy session accessor.

use bevy_ecs::prelude::*;
use std::sync::{Arc, Mutex};

use arcadesession::components::generator::GeneratorRoot;
use arcadesession::events::environment::EnvironmentCmd;
use arcadesession::events::session::{SessionRequest, SessionRequestEvent};
use arcadesession::game::{Environment, session_instance, start_session};
use arcadesession::resources::audio::AudioBridge;
use arcadesession::resources::clipstore::ClipStore;
use arcadesession::resources::collaborators::{Collaborators, Lifecycle};
use arcadesession::resources::input::InputState;
use arcadesession::resources::session::{SessionPhase, SessionState};
use arcadesession::resources::sessionconfig::SessionConfig;
use arcadesession::resources::ui::{GAME_RESULT_PANEL, GAME_RESULT_TEXT, PAUSED_PANEL};
use arcadesession::resources::worldtime::WorldTime;

const DT: f32 = 1.0 / 60.0;

type CallLog = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: CallLog,
}

impl Lifecycle for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn init(&mut self) {
        self.log.lock().unwrap().push(format!("{}.init", self.name));
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().push(format!("{}.stop", self.name));
    }
}

const SESSION_INI: &str = "\
[session]
menu_scene = GameMenuScene

[audio]
background_music = bgm
win_clip = win
lose_clip = lose

[clip.bgm]
path = assets/audio/bgm.ogg
length = 90

[clip.win]
path = assets/audio/win.wav
length = 0.05

[clip.lose]
path = assets/audio/lose.wav
length = 0.05
";

fn config_and_clips() -> (SessionConfig, ClipStore) {
    let mut config = SessionConfig::new();
    config.load_from_str(SESSION_INI).unwrap();
    let clips = ClipStore::load_from_str(SESSION_INI).unwrap();
    (config, clips)
}

fn recording_env() -> (Environment, CallLog) {
    let (config, clips) = config_and_clips();
    let log: CallLog = Arc::default();
    let factory_log = log.clone();
    let env = Environment::with_collaborators(config, clips, move || {
        Collaborators::new(
            Recorder {
                name: "score",
                log: factory_log.clone(),
            },
            Recorder {
                name: "bombs",
                log: factory_log.clone(),
            },
        )
    });
    (env, log)
}

fn generators_alive(env: &mut Environment) -> bool {
    let world = env.world_mut();
    let mut query = world.query_filtered::<Entity, With<GeneratorRoot>>();
    query.iter(world).next().is_some()
}

#[test]
fn new_environment_starts_a_running_session() {
    let (env, log) = recording_env();

    assert_eq!(env.scene(), "GameScene");
    assert!(env.is_session_scene());
    assert_eq!(env.loads(), 1);
    assert_eq!(env.session().unwrap().phase(), SessionPhase::Running);
    assert_eq!(*log.lock().unwrap(), vec!["score.init", "bombs.init"]);
}

#[test]
fn ten_frames_then_win() {
    let (mut env, log) = recording_env();

    for _ in 0..10 {
        env.frame(DT);
    }
    assert_eq!(env.session().unwrap().phase(), SessionPhase::Running);
    assert!(!env.session().unwrap().is_paused());

    env.request(SessionRequest::DeclareResult(true));
    env.frame(DT);

    let session = env.session().unwrap();
    assert_eq!(session.phase(), SessionPhase::End);
    assert!(session.is_finished());
    let ui = env.ui().unwrap();
    assert_eq!(ui.text(GAME_RESULT_TEXT), Some("You Win!!!"));
    assert!(ui.is_visible(GAME_RESULT_PANEL));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["score.init", "bombs.init", "score.stop", "bombs.stop"]
    );

    // the win stinger lasts 0.05s, a handful of frames at 60 fps
    assert!(generators_alive(&mut env));
    for _ in 0..5 {
        env.frame(DT);
    }
    assert!(!generators_alive(&mut env));
}

#[test]
fn held_pause_key_toggles_once() {
    let (mut env, _log) = recording_env();

    env.set_pause_key(true);
    env.frame(DT);
    env.frame(DT);
    env.frame(DT);
    assert!(env.session().unwrap().is_paused());
    assert_eq!(env.time().unwrap().time_scale, 0.0);
    assert!(env.ui().unwrap().is_visible(PAUSED_PANEL));

    env.set_pause_key(false);
    env.frame(DT);
    env.set_pause_key(true);
    env.frame(DT);
    assert!(!env.session().unwrap().is_paused());
    assert_eq!(env.time().unwrap().time_scale, 1.0);
    assert!(!env.ui().unwrap().is_visible(PAUSED_PANEL));
}

#[test]
fn restart_builds_a_fresh_session() {
    let (mut env, log) = recording_env();
    env.request(SessionRequest::Pause);
    env.request(SessionRequest::DeclareResult(false));
    env.frame(DT);

    env.request(SessionRequest::Restart);

    assert_eq!(env.loads(), 2);
    assert_eq!(env.scene(), "GameScene");
    let session = env.session().unwrap();
    assert_eq!(session.phase(), SessionPhase::Running);
    assert_eq!(session.result(), None);
    assert!(!session.is_paused());
    assert_eq!(env.time().unwrap().time_scale, 1.0);
    assert!(generators_alive(&mut env));
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "score.init",
            "bombs.init",
            "score.stop",
            "bombs.stop",
            "score.init",
            "bombs.init"
        ]
    );
}

#[test]
fn return_to_menu_leaves_the_session_scene() {
    let (mut env, _log) = recording_env();
    env.request(SessionRequest::Pause);

    env.request(SessionRequest::ReturnToMenu);

    assert_eq!(env.scene(), "GameMenuScene");
    assert!(!env.is_session_scene());
    assert!(env.session().is_none());
    assert_eq!(env.time().unwrap().time_scale, 1.0);

    // the menu has no session to talk to
    env.request(SessionRequest::Pause);
    env.frame(DT);
    assert_eq!(env.scene(), "GameMenuScene");
}

#[test]
fn loading_the_game_scene_from_the_menu_starts_over() {
    let (mut env, log) = recording_env();
    env.request(SessionRequest::ReturnToMenu);

    env.load("GameScene");

    assert_eq!(env.loads(), 3);
    assert_eq!(env.session().unwrap().phase(), SessionPhase::Running);
    assert_eq!(log.lock().unwrap().len(), 4);
}

#[test]
fn audio_thread_is_stopped_on_shutdown() {
    let (config, clips) = config_and_clips();
    let mut env = Environment::new(config, clips).with_audio_thread();
    assert!(env.world().contains_resource::<AudioBridge>());

    env.frame(DT);
    env.request(SessionRequest::Pause);
    env.frame(DT);

    env.shutdown();
    assert!(!env.world().contains_resource::<AudioBridge>());
}

#[test]
fn audio_thread_survives_restart() {
    let (config, clips) = config_and_clips();
    let mut env = Environment::new(config, clips).with_audio_thread();

    env.request(SessionRequest::Restart);

    assert!(env.world().contains_resource::<AudioBridge>());
    env.frame(DT);
}

// =============================================================================
// Session accessor
// =============================================================================

#[test]
fn accessor_creates_session_with_default_config() {
    let mut world = World::new();

    let session = session_instance(&mut world);
    assert_eq!(session.phase(), SessionPhase::Init);

    assert_eq!(*world.resource::<SessionConfig>(), SessionConfig::new());
    assert!(world.contains_resource::<WorldTime>());
    assert!(world.contains_resource::<InputState>());
}

#[test]
fn accessor_returns_the_same_instance() {
    let mut world = World::new();

    session_instance(&mut world).set_paused(true);

    assert!(session_instance(&mut world).is_paused());
    assert!(world.resource::<SessionState>().is_paused());
}

#[test]
fn accessor_keeps_an_existing_session() {
    let mut world = World::new();
    let mut existing = SessionState::new();
    existing.set_result(true);
    world.insert_resource(existing);

    assert_eq!(session_instance(&mut world).result(), Some(true));
    assert!(world.contains_resource::<SessionConfig>());
    assert!(world.contains_resource::<WorldTime>());
    assert!(world.contains_resource::<InputState>());
}

#[test]
fn preinserted_session_is_fully_wired() {
    let mut world = World::new();
    world.insert_resource(SessionState::new());
    session_instance(&mut world);
    start_session(&mut world);
    assert_eq!(world.resource::<SessionState>().phase(), SessionPhase::Running);

    world.trigger(SessionRequestEvent::new(SessionRequest::DeclareResult(true)));

    let session = world.resource::<SessionState>();
    assert_eq!(session.phase(), SessionPhase::End);
    assert_eq!(session.result(), Some(true));
}

#[test]
fn repeated_access_registers_observers_once() {
    let mut world = World::new();
    session_instance(&mut world);
    session_instance(&mut world);
    start_session(&mut world);

    world.trigger(SessionRequestEvent::new(SessionRequest::Restart));
    let reloads: Vec<EnvironmentCmd> = world
        .resource_mut::<Messages<EnvironmentCmd>>()
        .drain()
        .collect();
    assert_eq!(reloads, vec![EnvironmentCmd::ReloadCurrent]);
}
