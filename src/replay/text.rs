//! Plain structured text output.
//!
//! No escape codes, so it can be diffed, logged or fed to other tools.

use std::fmt::Write as _;

use crate::game::GameSession;

/// Render the session as plain text.
///
/// Output format:
/// ```text
/// === TURN 3 | Your move ===
/// BOARD (5x6):
/// RBGYPH
/// ...
/// HERO: HP 72/100, SP 18/100, buff 0
/// ENEMY: level 1, HP 54/120, ATK 14
/// COMBO: 2
/// LOG:
/// - Dealt 44 damage
/// ```
#[must_use]
pub fn render_text(session: &GameSession) -> String {
    let mut out = String::new();
    let board = session.board();
    let hero = session.hero();
    let enemy = session.enemy();

    let status = if session.is_game_over() {
        "GAME OVER".to_string()
    } else {
        session.phase().to_string()
    };
    let _ = writeln!(out, "=== TURN {} | {status} ===", session.turn());
    let _ = writeln!(out, "BOARD ({}x{}):", board.rows(), board.cols());
    let _ = writeln!(out, "{board}");

    if let Some(pos) = session.selection() {
        let _ = writeln!(out, "SELECTED: {pos}");
    }
    let _ = writeln!(
        out,
        "HERO: HP {}/{}, SP {}/{}, buff {}",
        hero.hp, hero.max_hp, hero.sp, hero.max_sp, hero.buff_turns
    );
    let _ = writeln!(
        out,
        "ENEMY: level {}, HP {}/{}, ATK {}",
        enemy.level, enemy.hp, enemy.max_hp, enemy.atk
    );
    let _ = writeln!(out, "COMBO: {}", session.combo());

    out.push_str("LOG:\n");
    for event in session.log().recent().take(8) {
        let _ = writeln!(out, "- {event}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Board, Combat, Pos};

    #[test]
    fn test_render_text_layout() {
        let config = GameConfig::default();
        let board: Board = "RGB\nGBR\nBRG".parse().unwrap();
        let mut session = GameSession::resume(config, 0, board, Combat::new(&config)).unwrap();
        session.tap_cell(Pos::new(1, 1), &mut ());

        let out = render_text(&session);
        assert!(out.starts_with("=== TURN 0 | Your move ==="));
        assert!(out.contains("BOARD (3x3):\nRGB\nGBR\nBRG\n"));
        assert!(out.contains("SELECTED: (1, 1)"));
        assert!(out.contains("HERO: HP 100/100, SP 0/100, buff 0"));
        assert!(out.contains("ENEMY: level 1, HP 120/120, ATK 14"));
        assert!(out.contains("- Game start!"));
    }
}
