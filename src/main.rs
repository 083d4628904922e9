//! Headless session runner.
//!
//! Loads `session.ini`, plays one session frame by frame at a fixed step and
//! simulates the player: pause key presses on chosen frames and a win or
//! loss declared on a chosen frame. After the result stinger has finished it
//! either restarts once or returns to the menu scene and exits.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --result win --pause-at 40 --pause-at 90
//! ```

use arcadesession::components::generator::GeneratorRoot;
use arcadesession::events::session::SessionRequest;
use arcadesession::game::Environment;
use arcadesession::resources::clipstore::ClipStore;
use arcadesession::resources::sessionconfig::SessionConfig;
use bevy_ecs::prelude::*;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Outcome {
    Win,
    Lose,
    Random,
}

/// Arcade session runner
#[derive(Parser)]
#[command(version, about = "Plays a headless arcade session from start to result.")]
struct Cli {
    /// Session configuration file.
    #[arg(long, value_name = "PATH", default_value = "./session.ini")]
    config: PathBuf,

    /// Maximum number of frames to run.
    #[arg(long, default_value_t = 1200)]
    frames: u32,

    /// Fixed frame rate of the simulated host.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Result declared by the simulated gameplay.
    #[arg(long, value_enum, default_value_t = Outcome::Random)]
    result: Outcome,

    /// Session frame on which the result is declared (random if omitted).
    #[arg(long, value_name = "FRAME")]
    declare_at: Option<u32>,

    /// Session frames on which the pause key is pressed.
    #[arg(long = "pause-at", value_name = "FRAME")]
    pause_at: Vec<u32>,

    /// Restart the session once after the first result.
    #[arg(long)]
    restart_once: bool,

    /// Forward audio commands to the background audio thread.
    #[arg(long)]
    audio_thread: bool,
}

fn generators_alive(env: &mut Environment) -> bool {
    let world = env.world_mut();
    let mut query = world.query_filtered::<Entity, With<GeneratorRoot>>();
    query.iter(world).next().is_some()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = SessionConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using default session config");
    }
    let clips = ClipStore::load_from_file(&cli.config).unwrap_or_else(|e| {
        warn!("{e}; no audio clips available");
        ClipStore::new()
    });

    let mut env = Environment::new(config, clips);
    if cli.audio_thread {
        env = env.with_audio_thread();
    }

    let dt = 1.0 / cli.fps.max(1) as f32;
    let mut restarts_left = u32::from(cli.restart_once);
    let mut loads_seen = env.loads();
    let mut session_frame: u32 = 0;
    let mut declare_at = cli
        .declare_at
        .unwrap_or_else(|| fastrand::u32(30..cli.frames.max(31)));

    for _ in 0..cli.frames {
        if env.loads() != loads_seen {
            loads_seen = env.loads();
            session_frame = 0;
            declare_at = cli
                .declare_at
                .unwrap_or_else(|| fastrand::u32(30..cli.frames.max(31)));
        }
        if !env.is_session_scene() {
            info!("Reached scene '{}', stopping", env.scene());
            break;
        }

        env.set_pause_key(cli.pause_at.contains(&session_frame));
        env.frame(dt);
        session_frame += 1;

        if session_frame == declare_at {
            let win = match cli.result {
                Outcome::Win => true,
                Outcome::Lose => false,
                Outcome::Random => fastrand::bool(),
            };
            env.request(SessionRequest::DeclareResult(win));
        }

        let finished = env.session().is_some_and(|s| s.is_finished());
        if finished && !generators_alive(&mut env) {
            if restarts_left > 0 {
                restarts_left -= 1;
                env.request(SessionRequest::Restart);
            } else {
                env.request(SessionRequest::ReturnToMenu);
            }
        }
    }

    if let Some(session) = env.session() {
        info!(
            "Stopped in scene '{}' with session phase {:?}, result {:?}",
            env.scene(),
            session.phase(),
            session.result()
        );
    }
    env.shutdown();
}
