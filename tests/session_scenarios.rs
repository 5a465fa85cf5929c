//! End-to-end turn scenarios through the public session API.
//!
//! Run with: cargo test session_scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use orbclash::game::{
    find_matches, pass_damage, Combat, GameEvent, Observer, Phase, SkillOutcome, Step,
    StepRecorder, TapOutcome, TurnReport,
};
use orbclash::replay::{Recording, ReplayEngine};
use orbclash::{Board, GameConfig, GameSession, Pos};

/// Swapping (0,2) with (1,2) completes `RRR` on the top row. No other run.
const SETUP: &str = "
    RRBGYP
    GYRHBG
    BGYPHR
    YPHRGB
    HBGYPH
";

fn resume(combat: impl FnOnce(&mut Combat), seed: u64) -> GameSession {
    let config = GameConfig::default();
    let mut state = Combat::new(&config);
    combat(&mut state);
    GameSession::resume(config, seed, SETUP.parse().unwrap(), state).unwrap()
}

fn swap(session: &mut GameSession, obs: &mut impl Observer) -> TapOutcome {
    session.tap_cell(Pos::new(0, 2), obs);
    session.tap_cell(Pos::new(1, 2), obs)
}

/// A seed whose refill after the opening swap makes no further match.
fn quiet_seed() -> u64 {
    (0..500)
        .find(|&seed| {
            let mut s = resume(|_| {}, seed);
            matches!(swap(&mut s, &mut ()), TapOutcome::Resolved(TurnReport { combo: 1, .. }))
        })
        .unwrap()
}

#[test]
fn test_single_match_full_turn() {
    let mut session = resume(|_| {}, quiet_seed());
    let TapOutcome::Resolved(report) = swap(&mut session, &mut ()) else {
        panic!("swap should resolve");
    };

    assert_eq!(report.damage, 22);
    assert_eq!(report.enemy_attack, Some(14));
    assert_eq!(session.enemy().hp, 98);
    assert_eq!(session.hero().hp, 86);
    assert_eq!(session.hero().sp, 6);
    assert_eq!(session.phase(), Phase::Player);
    assert!(find_matches(session.board(), 3).is_empty());
    assert_eq!(session.board().empty_count(), 0);

    let events: Vec<_> = session.log().chronological().to_vec();
    assert_eq!(
        events,
        vec![
            GameEvent::GameStarted,
            GameEvent::OrbsCleared {
                combo: 1,
                removed: 3,
                damage: 22,
                sp: 6
            },
            GameEvent::EnemyDamaged { damage: 22 },
            GameEvent::EnemyAttacked { damage: 14 },
        ]
    );
}

#[test]
fn test_cascade_log_matches_pending_total() {
    // Whatever the refill does, per-pass damage follows the combo formula and
    // sums to the settled total.
    let config = GameConfig::default();
    for seed in 0..50 {
        let mut session = resume(|_| {}, seed);
        let TapOutcome::Resolved(report) = swap(&mut session, &mut ()) else {
            panic!("swap should resolve");
        };
        let mut banked = 0;
        for event in session.log().chronological() {
            if let GameEvent::OrbsCleared {
                combo,
                removed,
                damage,
                ..
            } = *event
            {
                assert_eq!(damage, pass_damage(removed as usize, combo, &config));
                banked += damage;
            }
        }
        assert_eq!(banked, report.damage, "seed {seed}");
        assert!(report.combo >= 1);
    }
}

/// Swapping (2,2) with (3,2) clears `YYY` on row 2. The collapse then
/// stacks `RRR` in column 0, so gravity alone forces a second pass.
const GRAVITY_COMBO: &str = "
    RGBH
    RBGP
    YYHG
    RPYB
    GHBP
";

/// Refill seed for `GRAVITY_COMBO` that stops after the second pass.
const GRAVITY_SEED: u64 = 8;

fn cleared_passes(session: &GameSession) -> Vec<(u32, u32, u32)> {
    session
        .log()
        .chronological()
        .iter()
        .filter_map(|event| match *event {
            GameEvent::OrbsCleared {
                combo,
                removed,
                damage,
                ..
            } => Some((combo, removed, damage)),
            _ => None,
        })
        .collect()
}

fn gravity_session(config: GameConfig, buffed: bool) -> GameSession {
    let mut combat = Combat::new(&config);
    if buffed {
        combat.hero.buff_turns = 1;
    }
    GameSession::resume(config, GRAVITY_SEED, GRAVITY_COMBO.parse().unwrap(), combat).unwrap()
}

#[test]
fn test_gravity_cascade_banks_combo_damage() {
    let mut session = gravity_session(GameConfig::default(), true);
    let mut rec = StepRecorder::default();
    session.tap_cell(Pos::new(2, 2), &mut rec);
    let TapOutcome::Resolved(report) = session.tap_cell(Pos::new(3, 2), &mut rec) else {
        panic!("swap should resolve");
    };

    // 3 orbs at combo 1 and 4 at combo 2 bank 22 + 36 = 58, doubled by the buff.
    assert_eq!(cleared_passes(&session), vec![(1, 3, 22), (2, 4, 36)]);
    assert_eq!(report.combo, 2);
    assert_eq!(report.damage, 116);
    assert_eq!(session.enemy().hp, 4);
    assert_eq!(report.enemy_attack, Some(14));
    assert_eq!(session.hero().sp, 14);
    assert!(!session.hero().is_buffed());
    assert_eq!(session.phase(), Phase::Player);
    assert!(find_matches(session.board(), 3).is_empty());

    let cleared = rec.steps.iter().filter(|s| **s == Step::Cleared).count();
    let refilled = rec.steps.iter().filter(|s| **s == Step::Refilled).count();
    assert_eq!((cleared, refilled), (2, 2));
    assert_eq!(rec.pauses, 5);
}

#[test]
fn test_cascade_limit_ends_resolution_early() {
    let config = GameConfig {
        cascade_limit: 1,
        ..GameConfig::default()
    };
    let mut session = gravity_session(config, false);
    session.tap_cell(Pos::new(2, 2), &mut ());
    let TapOutcome::Resolved(report) = session.tap_cell(Pos::new(3, 2), &mut ()) else {
        panic!("swap should resolve");
    };

    assert_eq!(cleared_passes(&session), vec![(1, 3, 22)]);
    assert_eq!(report.combo, 1);
    assert_eq!(report.damage, 22);
    assert_eq!(session.enemy().hp, 98);
    // The stacked run is left on a full board for the next turn.
    assert!(!find_matches(session.board(), 3).is_empty());
    assert_eq!(session.board().empty_count(), 0);
    assert_eq!(session.phase(), Phase::Player);
    assert!(session.accepts_input());
}

#[test]
fn test_killing_blow_skips_enemy_turn() {
    let mut session = resume(|c| c.enemy.hp = 5, 0);
    let mut rec = StepRecorder::default();
    let TapOutcome::Resolved(report) = swap(&mut session, &mut rec) else {
        panic!("swap should resolve");
    };

    assert!(report.enemy_defeated);
    assert_eq!(report.enemy_attack, None);
    assert!(!rec.steps.contains(&Step::EnemyAttacked));
    assert!(rec.steps.contains(&Step::EnemySpawned));
    assert_eq!(session.hero().hp, 100);
    assert_eq!(session.enemy().level, 2);
    assert_eq!((session.enemy().hp, session.enemy().atk), (144, 16));
    assert!(session.accepts_input());
}

#[test]
fn test_wasted_swap_changes_nothing() {
    let mut session = resume(|_| {}, 0);
    let before = session.snapshot();

    session.tap_cell(Pos::new(2, 0), &mut ());
    let outcome = session.tap_cell(Pos::new(3, 0), &mut ());

    assert_eq!(outcome, TapOutcome::Wasted);
    let after = session.snapshot();
    assert_eq!(after.board, before.board);
    assert_eq!(after.hero, before.hero);
    assert_eq!(after.enemy, before.enemy);
    assert_eq!(after.selection, None);
    assert!(session.accepts_input());
}

#[test]
fn test_skills_are_free_actions() {
    let mut session = resume(
        |c| {
            c.hero.sp = 100;
            c.hero.hp = 40;
        },
        0,
    );
    let mut rec = StepRecorder::default();

    assert!(session.cast_heal(&mut rec).is_cast());
    assert!(session.cast_fire(&mut rec).is_cast());
    assert_eq!(session.cast_buff(&mut rec), SkillOutcome::Unaffordable);

    assert_eq!(session.hero().hp, 70);
    assert_eq!(session.hero().sp, 35);
    assert_eq!(session.enemy().hp, 70);
    assert_eq!(session.phase(), Phase::Player);
    assert_eq!(rec.steps, vec![Step::SkillCast, Step::SkillCast]);
    assert_eq!(rec.pauses, 0);
}

#[test]
fn test_buffed_turn_doubles_and_expires() {
    let mut session = resume(|c| c.hero.buff_turns = 1, quiet_seed());
    let TapOutcome::Resolved(report) = swap(&mut session, &mut ()) else {
        panic!("swap should resolve");
    };
    assert_eq!(report.damage, 44);
    assert_eq!(session.enemy().hp, 76);
    assert!(!session.hero().is_buffed());
}

#[test]
fn test_game_over_locks_everything() {
    let mut session = resume(|c| c.hero.hp = 10, 0);
    swap(&mut session, &mut ());

    assert!(session.is_game_over());
    assert_eq!(session.hero().hp, 0);
    let frozen = session.snapshot();

    assert_eq!(session.tap_cell(Pos::new(0, 0), &mut ()), TapOutcome::Ignored);
    assert_eq!(session.cast_fire(&mut ()), SkillOutcome::Ignored);
    assert_eq!(session.snapshot(), frozen);

    session.restart(&mut ());
    assert!(session.accepts_input());
    assert_eq!(session.hero().hp, 100);
    assert!(find_matches(session.board(), 3).is_empty());
}

#[test]
fn test_game_over_observer_order() {
    let mut session = resume(|c| c.hero.hp = 1, 0);
    let mut rec = StepRecorder::default();
    swap(&mut session, &mut rec);
    assert_eq!(rec.steps.last(), Some(&Step::GameOver));
    assert_eq!(session.log().latest(), Some(&GameEvent::Defeated));
}

#[test]
fn test_recorded_session_replays_exactly() {
    let mut session = GameSession::new(GameConfig::default(), 2024).unwrap();
    for _ in 0..4 {
        let Some(hint) = orbclash::game::best_swap(session.board(), 3) else {
            break;
        };
        session.tap_cell(hint.from, &mut ());
        session.tap_cell(hint.to, &mut ());
    }
    session.restart(&mut ());
    session.tap_cell(Pos::new(1, 1), &mut ());

    let recording = Recording::from_session(&session);
    let engine = ReplayEngine::new_at_step(recording.clone(), recording.actions.len()).unwrap();
    assert_eq!(engine.session().snapshot(), session.snapshot());
}

#[test]
fn test_board_text_round_trips_through_session() {
    let board: Board = SETUP.parse().unwrap();
    let session = resume(|_| {}, 0);
    assert_eq!(session.board(), &board);
    assert_eq!(board.to_string().parse::<Board>().unwrap(), board);
}
