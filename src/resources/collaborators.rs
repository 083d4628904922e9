//! Lifecycle collaborators.
//!
//! The session drives exactly two subsystems, a scoring tracker and a
//! hazard tracker, through [`Lifecycle::init`] at the start of a session and
//! [`Lifecycle::stop`] at its end. The session never looks inside them.
//!
//! [`ScoreTracker`] and [`BombTracker`] are the stock implementations;
//! hosts may plug in their own through [`Collaborators::new`].

use bevy_ecs::prelude::Resource;
use log::debug;

/// Start/stop hooks tied to session phases.
pub trait Lifecycle: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;
    /// Prepare for a new session.
    fn init(&mut self);
    /// Stop working; the session is over.
    fn stop(&mut self);
}

/// The two collaborators driven by the session.
#[derive(Resource)]
pub struct Collaborators {
    pub scoring: Box<dyn Lifecycle>,
    pub hazard: Box<dyn Lifecycle>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(ScoreTracker::default(), BombTracker::default())
    }
}

impl Collaborators {
    pub fn new(scoring: impl Lifecycle + 'static, hazard: impl Lifecycle + 'static) -> Self {
        Collaborators {
            scoring: Box::new(scoring),
            hazard: Box::new(hazard),
        }
    }

    pub fn init_all(&mut self) {
        for c in [&mut self.scoring, &mut self.hazard] {
            debug!("init collaborator '{}'", c.name());
            c.init();
        }
    }

    pub fn stop_all(&mut self) {
        for c in [&mut self.scoring, &mut self.hazard] {
            debug!("stop collaborator '{}'", c.name());
            c.stop();
        }
    }
}

/// Points collected during a session. Points only count between `init` and
/// `stop`.
#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    score: u32,
    active: bool,
}

impl ScoreTracker {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn add(&mut self, points: u32) {
        if self.active {
            self.score = self.score.saturating_add(points);
        }
    }
}

impl Lifecycle for ScoreTracker {
    fn name(&self) -> &str {
        "score"
    }

    fn init(&mut self) {
        self.score = 0;
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

/// Bombs currently armed on the field. Stopping defuses everything and
/// refuses new bombs.
#[derive(Debug, Clone, Default)]
pub struct BombTracker {
    armed: u32,
    active: bool,
}

impl BombTracker {
    pub fn armed(&self) -> u32 {
        self.armed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns false when the tracker is stopped.
    pub fn arm(&mut self) -> bool {
        if self.active {
            self.armed += 1;
        }
        self.active
    }

    pub fn detonate(&mut self) {
        self.armed = self.armed.saturating_sub(1);
    }
}

impl Lifecycle for BombTracker {
    fn name(&self) -> &str {
        "bombs"
    }

    fn init(&mut self) {
        self.armed = 0;
        self.active = true;
    }

    fn stop(&mut self) {
        self.armed = 0;
        self.active = false;
    }
}
