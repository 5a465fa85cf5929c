//! Session invariants - sanity checks that detect engine bugs.
//!
//! These hold between inbound events in every correctly played session.
//! They are checked after each event in debug builds.

use std::fmt;

use crate::game::{GameSession, Phase};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all session invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(session: &GameSession) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });

    let hero = session.hero();
    if hero.sp > hero.max_sp {
        fail(format!("SP {} exceeds max {}", hero.sp, hero.max_sp));
    }
    if hero.hp > hero.max_hp {
        fail(format!("hero HP {} exceeds max {}", hero.hp, hero.max_hp));
    }

    let enemy = session.enemy();
    if enemy.hp > enemy.max_hp {
        fail(format!("enemy HP {} exceeds max {}", enemy.hp, enemy.max_hp));
    }
    if enemy.is_defeated() && !session.is_game_over() {
        fail(format!("level {} enemy left on the field at 0 HP", enemy.level));
    }

    if session.phase() == Phase::Player {
        let empty = session.board().empty_count();
        if empty > 0 {
            fail(format!("{empty} empty cells during the player phase"));
        }
    }

    if session.phase() != Phase::Resolving && session.pending_damage() > 0 {
        fail(format!(
            "{} damage still pending outside resolution",
            session.pending_damage()
        ));
    }

    if let Some(pos) = session.selection()
        && !session.board().contains(pos)
    {
        fail(format!("selection {pos} is off the board"));
    }

    // Game over and hero death go together.
    if session.is_game_over() {
        if !session.is_input_locked() {
            fail("input unlocked after game over".to_string());
        }
        if hero.is_alive() {
            fail(format!("game over with hero at {} HP", hero.hp));
        }
    } else if !hero.is_alive() {
        fail("hero at 0 HP but the game is not over".to_string());
    }

    violations
}

/// Assert all session invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(session: &GameSession) {
    let violations = check_invariants(session);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Session invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_session: &GameSession) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Board, Combat, Pos};

    const BOARD: &str = "RGB\nGBR\nBRG";

    fn resume(board: Board, combat: Combat) -> GameSession {
        GameSession::resume(GameConfig::default(), 0, board, combat).unwrap()
    }

    #[test]
    fn test_fresh_session_passes() {
        let session = GameSession::new(GameConfig::default(), 42).unwrap();
        assert!(check_invariants(&session).is_empty());
    }

    #[test]
    fn test_sp_over_cap_detected() {
        let mut combat = Combat::new(&GameConfig::default());
        combat.hero.sp = combat.hero.max_sp + 1;
        let violations = check_invariants(&resume(BOARD.parse().unwrap(), combat));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("SP"));
    }

    #[test]
    fn test_empty_cell_detected() {
        let mut board: Board = BOARD.parse().unwrap();
        board.set(Pos::new(1, 1), None);
        let violations = check_invariants(&resume(board, Combat::new(&GameConfig::default())));
        assert!(violations[0].message.contains("empty"));
    }

    #[test]
    fn test_dead_hero_without_game_over_detected() {
        let mut combat = Combat::new(&GameConfig::default());
        combat.hero.hp = 0;
        let violations = check_invariants(&resume(BOARD.parse().unwrap(), combat));
        assert!(violations.iter().any(|v| v.message.contains("not over")));
    }
}
