//! Game replay and viewing system.
//!
//! Because sessions are fully deterministic, a replay requires only:
//! - `seed: u64` - The seed for board generation and refills
//! - `config: GameConfig` - The ruleset
//! - `actions: Vec<Action>` - Every accepted tap, cast and restart
//!
//! No board deltas are stored. To view step N, re-run the session from the
//! start through the first N actions.
//!
//! # Time Travel
//!
//! - **Forward**: Apply the next action
//! - **Backward**: Re-run from the start to (`position` - 1)
//! - **Jump to step N**: Re-run from the start to N

mod render;
mod text;

pub use render::render_ascii;
pub use text::render_text;

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::{Action, GameSession};

/// Minimal recording - seed, config and the accepted inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Seed the session was created with.
    pub seed: u64,
    /// Ruleset.
    pub config: GameConfig,
    /// Accepted inbound events, in order.
    pub actions: Vec<Action>,
}

impl Recording {
    /// Create a recording from its parts.
    #[must_use]
    pub const fn new(seed: u64, config: GameConfig, actions: Vec<Action>) -> Self {
        Self {
            seed,
            config,
            actions,
        }
    }

    /// Capture everything needed to replay `session`.
    #[must_use]
    pub fn from_session(session: &GameSession) -> Self {
        Self::new(session.seed(), *session.config(), session.history().to_vec())
    }

    /// Save the recording to a file as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a recording from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Errors that can occur during replay.
#[derive(Debug)]
pub enum ReplayError {
    /// Reading or writing the recording failed.
    Io(io::Error),
    /// The recording is not valid JSON for this format.
    Format(serde_json::Error),
    /// The recorded config is not playable.
    Config(ConfigError),
    /// Requested step is past the end of the recording.
    StepOutOfBounds {
        /// Step requested.
        requested: usize,
        /// Last step (inclusive).
        max_step: usize,
    },
    /// Already at the first step.
    AtStart,
    /// Every recorded action has been applied.
    Finished,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Recording I/O failed: {e}"),
            Self::Format(e) => write!(f, "Malformed recording: {e}"),
            Self::Config(e) => write!(f, "Recorded config is invalid: {e}"),
            Self::StepOutOfBounds {
                requested,
                max_step,
            } => write!(f, "Step {requested} out of bounds (max: {max_step})"),
            Self::AtStart => write!(f, "Already at the first step"),
            Self::Finished => write!(f, "Replay is already over"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

impl From<ConfigError> for ReplayError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Replay engine - steps through a recorded session.
///
/// Since sessions are deterministic, this engine can:
/// - Step forward by applying one action
/// - Step backward by replaying from the start
/// - Jump to any step by replaying from the start
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recording: Recording,
    session: GameSession,
    position: usize,
}

impl ReplayEngine {
    /// Create a replay engine positioned before the first action.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded config is invalid.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        Self::new_at_step(recording, 0)
    }

    /// Create a replay engine with the first `step` actions applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded config is invalid or `step` is past
    /// the end of the recording.
    pub fn new_at_step(recording: Recording, step: usize) -> Result<Self, ReplayError> {
        let max_step = recording.actions.len();
        if step > max_step {
            return Err(ReplayError::StepOutOfBounds {
                requested: step,
                max_step,
            });
        }

        let mut session = GameSession::new(recording.config, recording.seed)?;
        for &action in &recording.actions[..step] {
            session.apply(action, &mut ());
        }

        Ok(Self {
            recording,
            session,
            position: step,
        })
    }

    /// Get the recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Number of actions applied so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Total number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recording.actions.len()
    }

    /// Whether the recording holds no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recording.actions.is_empty()
    }

    /// Whether every action has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.len()
    }

    /// The session at the current position.
    #[must_use]
    pub const fn session(&self) -> &GameSession {
        &self.session
    }

    /// The action that produced the current position.
    #[must_use]
    pub fn last_action(&self) -> Option<Action> {
        self.position
            .checked_sub(1)
            .and_then(|i| self.recording.actions.get(i).copied())
    }

    /// Apply the next action.
    ///
    /// # Errors
    ///
    /// Returns an error if every action has been applied.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        let Some(&action) = self.recording.actions.get(self.position) else {
            return Err(ReplayError::Finished);
        };
        self.session.apply(action, &mut ());
        self.position += 1;
        Ok(())
    }

    /// Step back one action by replaying from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if already at the first step.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        if self.position == 0 {
            return Err(ReplayError::AtStart);
        }
        self.goto_step(self.position - 1)
    }

    /// Jump to the state after `step` actions.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is past the end of the recording.
    pub fn goto_step(&mut self, step: usize) -> Result<(), ReplayError> {
        let recording = self.recording.clone();
        *self = Self::new_at_step(recording, step)?;
        Ok(())
    }

    /// Render the current position to ASCII for terminal viewing.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        render_ascii(&self.session, self.position)
    }

    /// Render the current position as plain structured text.
    #[must_use]
    pub fn render_text(&self) -> String {
        render_text(&self.session)
    }
}
