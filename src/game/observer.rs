//! Presentation callbacks.
//!
//! The engine reports every discrete mutation to an [`Observer`] and asks it
//! to pause between cascade steps. The engine's results never depend on what
//! the observer does, so tests pass `&mut ()` and run with no delay.

use std::time::Duration;

use crate::game::GameSession;

/// A discrete state change worth drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A fresh board was dealt.
    Deal,
    /// The selection changed.
    Selection,
    /// Two orbs were exchanged.
    Swapped,
    /// An unproductive swap was undone.
    Reverted,
    /// Matched orbs were removed.
    Cleared,
    /// Columns collapsed and refilled.
    Refilled,
    /// Banked damage was applied to the enemy.
    Settled,
    /// The enemy attacked.
    EnemyAttacked,
    /// A defeated enemy was replaced.
    EnemySpawned,
    /// A skill was cast.
    SkillCast,
    /// The hero fell.
    GameOver,
}

/// Receives state changes from a [`GameSession`].
pub trait Observer {
    /// Called after each mutation with read access to the session.
    fn on_step(&mut self, step: Step, session: &GameSession);

    /// Suspension point between cascade steps.
    ///
    /// The default returns immediately.
    fn pause(&mut self, delay: Duration) {
        let _ = delay;
    }
}

/// Headless observer: ignores everything.
impl Observer for () {
    fn on_step(&mut self, _step: Step, _session: &GameSession) {}
}

/// Observer that records the steps and pauses it saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepRecorder {
    /// Steps in the order reported.
    pub steps: Vec<Step>,
    /// Total requested pause time.
    pub paused: Duration,
    /// Number of pause requests.
    pub pauses: u32,
}

impl Observer for StepRecorder {
    fn on_step(&mut self, step: Step, _session: &GameSession) {
        self.steps.push(step);
    }

    fn pause(&mut self, delay: Duration) {
        self.paused += delay;
        self.pauses += 1;
    }
}
