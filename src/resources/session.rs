//! Session state resource.
//!
//! [`SessionState`] is the single source of truth for the lifecycle of one
//! play session. It is mutated only by the session systems in
//! [`crate::systems::session`] and by the request observer in
//! [`crate::events::session`].
//!
//! A session moves strictly forward through [`SessionPhase`]:
//!
//! ```text
//! Init -> Start -> Running -> End
//! ```
//!
//! A new session needs a fresh `SessionState`, which the host creates when it
//! reloads the environment.

use bevy_ecs::prelude::Resource;

use crate::components::mapposition::MapPosition;

/// Coarse lifecycle stage of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Init,
    Start,
    Running,
    End,
}

/// Resume point of the per-frame session driver.
///
/// The driver is a coroutine flattened into a state machine: each variant
/// names where execution continues on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriverStep {
    /// The environment has not started the session yet.
    #[default]
    Dormant,
    /// `run_init` is due.
    Initializing,
    /// Waiting for the phase to leave `Init`, then `run_start`.
    WaitingForStart,
    /// Ticking every frame while `Running`, `run_end` once it stops.
    Polling,
    /// `run_end` has run; nothing left to do for this session.
    Finished,
}

/// Authoritative state of the current play session.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SessionState {
    phase: SessionPhase,
    is_paused: bool,
    result: Option<bool>,
    driver: DriverStep,
    /// Where result stingers are emitted.
    pub anchor: MapPosition,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Create a dormant session in [`SessionPhase::Init`].
    pub fn new() -> Self {
        SessionState {
            phase: SessionPhase::Init,
            is_paused: false,
            result: None,
            driver: DriverStep::Dormant,
            anchor: MapPosition::default(),
        }
    }

    pub fn with_anchor(mut self, anchor: MapPosition) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Move to `phase`, returning the phase that was left.
    pub fn set_phase(&mut self, phase: SessionPhase) -> SessionPhase {
        std::mem::replace(&mut self.phase, phase)
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
    }

    /// The declared result: `Some(true)` for a win, `Some(false)` for a loss,
    /// `None` while no result has been declared.
    pub fn result(&self) -> Option<bool> {
        self.result
    }

    pub fn set_result(&mut self, result: bool) {
        self.result = Some(result);
    }

    pub fn driver(&self) -> DriverStep {
        self.driver
    }

    pub fn set_driver(&mut self, step: DriverStep) {
        self.driver = step;
    }

    /// Whether the environment has started this session.
    pub fn is_started(&self) -> bool {
        self.driver != DriverStep::Dormant
    }

    /// Whether the session has run its end-of-session sequence.
    pub fn is_finished(&self) -> bool {
        self.driver == DriverStep::Finished
    }
}
