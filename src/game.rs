//! Game layer for Orbclash.
//!
//! - Board with orbs, matching, collapse and refill
//! - Hero and enemy combat with combo scaling
//! - Skills paid for with SP
//! - The session aggregate that sequences a turn
//! - Observer hooks for presentation

mod board;
mod combat;
mod events;
mod hints;
mod invariants;
mod matching;
mod observer;
mod skills;
mod snapshot;
mod state;

pub use board::{Board, Orb, Pos};
pub use combat::{
    orb_sp, pass_damage, scaled, Combat, Enemy, EnemyAttack, Hero, Settlement,
};
pub use events::{EventLog, GameEvent, EVENT_LOG_CAPACITY};
pub use hints::{best_swap, productive_swaps, Hint};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use matching::{find_matches, has_match, matched_cells, MatchGroup};
pub use observer::{Observer, Step, StepRecorder};
pub use skills::{Skill, SkillOutcome};
pub use snapshot::Snapshot;
pub use state::{Action, GameSession, Phase, Resolution, TapOutcome, TurnReport};
