//! ASCII renderer for terminal viewing with ANSI colors.

use std::fmt::Write as _;

use crate::game::{GameSession, Orb, Pos};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const REVERSE: &str = "\x1b[7m";

/// ANSI color for each orb.
const fn orb_color(orb: Orb) -> &'static str {
    match orb {
        Orb::Red => "\x1b[31m",
        Orb::Blue => "\x1b[34m",
        Orb::Green => "\x1b[32m",
        Orb::Yellow => "\x1b[33m",
        Orb::Purple => "\x1b[35m",
        Orb::Heart => "\x1b[95m",
    }
}

/// Render the session to ASCII with ANSI colors.
///
/// Output format:
/// ```text
/// Step 12   Level 2   Combo 0   Your move
/// ┌─────────────┐
/// │ R B G Y P H │
/// │ ...         │
/// └─────────────┘
/// Hero  HP  86/100  SP  24/100
/// Enemy HP 144/144  ATK 16
/// ```
#[must_use]
pub fn render_ascii(session: &GameSession, step: usize) -> String {
    let mut out = String::new();
    let board = session.board();
    let hero = session.hero();
    let enemy = session.enemy();

    let _ = writeln!(
        out,
        "{BOLD}Step {step}{RESET}   Level {}   Combo {}   {}",
        enemy.level,
        session.combo(),
        session.phase()
    );

    let inner = board.cols() * 2 + 1;
    let _ = writeln!(out, "┌{}┐", "─".repeat(inner));
    for row in 0..board.rows() {
        out.push('│');
        for col in 0..board.cols() {
            let pos = Pos::new(row, col);
            out.push(' ');
            let selected = session.selection() == Some(pos);
            if selected {
                out.push_str(REVERSE);
            }
            match board.get(pos) {
                Some(orb) => {
                    let _ = write!(out, "{}{}{RESET}", orb_color(orb), orb.letter());
                }
                None => {
                    let _ = write!(out, "{DIM}.{RESET}");
                }
            }
        }
        out.push_str(" │\n");
    }
    let _ = writeln!(out, "└{}┘", "─".repeat(inner));

    let buff = if hero.is_buffed() { "  RAGE" } else { "" };
    let _ = writeln!(
        out,
        "Hero  HP {:>3}/{}  SP {:>3}/{}{buff}",
        hero.hp, hero.max_hp, hero.sp, hero.max_sp
    );
    let _ = writeln!(
        out,
        "Enemy HP {:>3}/{}  ATK {}",
        enemy.hp, enemy.max_hp, enemy.atk
    );
    if session.is_game_over() {
        let _ = writeln!(out, "{BOLD}GAME OVER{RESET}");
    }
    out
}
