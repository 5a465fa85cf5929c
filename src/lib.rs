// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Orbclash: a deterministic match-3 puzzle engine with turn-based combat.
//!
//! The player swaps adjacent orbs; every pass of the resulting cascade banks
//! damage that grows with the combo count. Once the board settles the damage
//! hits the enemy, which then strikes back. Skills spend SP earned from
//! cleared orbs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / TUI      Autoplay batches   │
//! ├─────────────────────────────────────┤
//! │  GameSession  (turn sequencing)     │
//! ├──────────────────┬──────────────────┤
//! │   Board engine   │  Combat engine   │
//! └──────────────────┴──────────────────┘
//! ```
//!
//! All randomness flows from one seeded `ChaCha8Rng` per session, so a seed
//! plus the list of accepted inputs reproduces a game exactly. See
//! [`replay`].

pub mod autoplay;
pub mod config;
pub mod error;
pub mod game;
pub mod replay;

pub use config::GameConfig;
pub use error::{BoardParseError, ConfigError};

// Re-export key game types at crate root for convenience
pub use game::{Action, Board, GameSession, Observer, Orb, Phase, Pos, Skill, TapOutcome};
