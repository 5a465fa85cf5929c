#![no_main]

//! Session input fuzzer.
//!
//! Drives a session with arbitrary taps, casts and restarts under a fuzzed
//! ruleset and checks the invariants after every event.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use orbclash::game::{check_invariants, Action, GameSession, Pos, Skill};
use orbclash::GameConfig;

/// A fuzzer-generated inbound event.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    Tap { row: u8, col: u8 },
    Heal,
    Fire,
    Buff,
    Restart,
}

impl From<FuzzAction> for Action {
    fn from(action: FuzzAction) -> Self {
        match action {
            FuzzAction::Tap { row, col } => {
                Action::Tap(Pos::new(usize::from(row % 10), usize::from(col % 10)))
            }
            FuzzAction::Heal => Action::Cast(Skill::Heal),
            FuzzAction::Fire => Action::Cast(Skill::Fire),
            FuzzAction::Buff => Action::Cast(Skill::Buff),
            FuzzAction::Restart => Action::Restart,
        }
    }
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    seed: u64,
    rows: u8,
    cols: u8,
    colors: u8,
    min_match: u8,
    hp: u16,
    actions: Vec<FuzzAction>,
}

fuzz_target!(|input: SessionInput| {
    let config = GameConfig {
        rows: usize::from(input.rows % 9) + 1,
        cols: usize::from(input.cols % 9) + 1,
        colors: input.colors % 4 + 3,
        min_match: usize::from(input.min_match % 4) + 2,
        player_max_hp: u32::from(input.hp) + 1,
        step_delay_ms: 0,
        ..GameConfig::default()
    };
    let Ok(mut session) = GameSession::new(config, input.seed) else {
        return;
    };

    for action in input.actions.into_iter().take(200) {
        session.apply(action.into(), &mut ());
        let violations = check_invariants(&session);
        assert!(violations.is_empty(), "{violations:?}");
    }
});
