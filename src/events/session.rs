//! External session requests and phase notifications.
//!
//! Gameplay and UI code never call into the session directly. They trigger
//! a [`SessionRequestEvent`] (for example from a "Pause" button or from the
//! rule that detects the player lost) and [`session_request_observer`]
//! applies it through the same [`SessionContext`] the per-frame driver uses.
//!
//! Every phase transition triggers [`SessionPhaseChanged`].
//!
//! ```ignore
//! commands.trigger(SessionRequestEvent::new(SessionRequest::DeclareResult(true)));
//! ```
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::resources::session::SessionPhase;
use crate::systems::session::SessionContext;

/// Operations the session exposes to the rest of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    /// `true` for a win, `false` for a loss. Ends the session.
    DeclareResult(bool),
    Pause,
    Continue,
    /// Reload the game scene; time scale is left as is.
    Restart,
    /// Load the menu scene with time scale reset to normal.
    ReturnToMenu,
}

/// Event carrying a [`SessionRequest`].
#[derive(Event, Debug, Clone, Copy)]
pub struct SessionRequestEvent {
    pub request: SessionRequest,
}

impl SessionRequestEvent {
    pub fn new(request: SessionRequest) -> Self {
        SessionRequestEvent { request }
    }
}

/// Event triggered on every session phase transition.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPhaseChanged {
    pub from: SessionPhase,
    pub to: SessionPhase,
}

/// Observer that applies a [`SessionRequest`].
///
/// Requests are honoured in any phase; pausing before the session runs or
/// after it ended is allowed, it just has no gameplay effect.
pub fn session_request_observer(trigger: On<SessionRequestEvent>, mut ctx: SessionContext) {
    let request = trigger.event().request;
    debug!(
        "SessionRequestEvent {:?} in phase {:?}",
        request,
        ctx.session.phase()
    );
    match request {
        SessionRequest::DeclareResult(result) => ctx.declare_result(result),
        SessionRequest::Pause => ctx.pause(),
        SessionRequest::Continue => ctx.continue_session(),
        SessionRequest::Restart => ctx.restart_session(),
        SessionRequest::ReturnToMenu => ctx.return_to_menu(),
    }
}

pub fn log_phase_change_observer(trigger: On<SessionPhaseChanged>) {
    let change = trigger.event();
    info!("SessionPhaseChanged {:?} -> {:?}", change.from, change.to);
}
