//! Headless play: a greedy policy and a parallel batch runner.
//!
//! Provides a pure function interface: `(config, seed) -> GameResult`.
//! Batches run games in parallel with rayon and merge per-thread stats.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::{best_swap, GameSession, Observer, Pos, Skill, SkillOutcome, TapOutcome};

/// Default turn cap for headless games.
pub const DEFAULT_MAX_TURNS: u32 = 500;

/// Heal when HP falls below this share of max.
const HEAL_THRESHOLD_PERCENT: u32 = 40;

/// What the policy wants to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Cast a skill.
    Cast(Skill),
    /// Swap two adjacent cells.
    Swap {
        /// First cell tapped.
        from: Pos,
        /// Second cell tapped.
        to: Pos,
    },
}

/// How a headless game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The hero fell.
    Defeated,
    /// The turn cap was reached with the hero alive.
    Survived,
    /// No productive swap and nothing worth casting.
    Stuck,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Defeated => "defeated",
            Self::Survived => "survived",
            Self::Stuck => "stuck",
        };
        f.write_str(name)
    }
}

/// Result of one headless game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Seed the game was dealt from.
    pub seed: u64,
    /// Productive swaps resolved.
    pub turns: u32,
    /// Enemies killed.
    pub enemies_defeated: u32,
    /// Level of the enemy on the field at the end.
    pub highest_level: u32,
    /// Longest cascade.
    pub max_combo: u32,
    /// Damage dealt by settlements and skills.
    pub total_damage: u64,
    /// How it ended.
    pub outcome: Outcome,
}

/// Greedy policy.
///
/// In priority order: heal when low, fire when it kills, buff when idle,
/// otherwise the swap that clears the most cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autoplayer {
    max_turns: u32,
}

impl Default for Autoplayer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl Autoplayer {
    /// Policy that stops after `max_turns` productive swaps.
    #[must_use]
    pub const fn new(max_turns: u32) -> Self {
        Self { max_turns }
    }

    /// Turn cap.
    #[must_use]
    pub const fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// Pick the next move, or `None` if nothing is worth doing.
    ///
    /// Skills are only considered while `allow_casts` is set.
    #[must_use]
    pub fn decide(session: &GameSession, allow_casts: bool) -> Option<Move> {
        if !session.accepts_input() {
            return None;
        }
        let config = session.config();
        let hero = session.hero();
        let enemy = session.enemy();
        let affordable = |skill: Skill| hero.sp >= skill.cost(config);

        if allow_casts {
            let low = u64::from(hero.hp) * 100
                < u64::from(hero.max_hp) * u64::from(HEAL_THRESHOLD_PERCENT);
            if low && affordable(Skill::Heal) {
                return Some(Move::Cast(Skill::Heal));
            }
            if enemy.hp <= config.fire.damage && affordable(Skill::Fire) {
                return Some(Move::Cast(Skill::Fire));
            }
            if !hero.is_buffed() && affordable(Skill::Buff) {
                return Some(Move::Cast(Skill::Buff));
            }
        }

        best_swap(session.board(), config.min_match).map(|hint| Move::Swap {
            from: hint.from,
            to: hint.to,
        })
    }

    /// Play `session` until defeat, the turn cap, or no move is left.
    pub fn play<O: Observer>(&self, session: &mut GameSession, observer: &mut O) -> GameResult {
        let level_at_start = session.enemy().level;
        let mut max_combo = 0u32;
        let mut total_damage = 0u64;
        let mut enemies_defeated = 0u32;
        let mut casts_this_turn = 0usize;

        let outcome = loop {
            if session.is_game_over() {
                break Outcome::Defeated;
            }
            if session.turn() >= self.max_turns {
                break Outcome::Survived;
            }

            // At most one cast of each skill between swaps.
            let allow_casts = casts_this_turn < Skill::ALL.len();
            let Some(next) = Self::decide(session, allow_casts) else {
                break Outcome::Stuck;
            };

            match next {
                Move::Cast(skill) => {
                    casts_this_turn += 1;
                    if let SkillOutcome::Cast {
                        amount,
                        enemy_defeated,
                    } = session.cast(skill, observer)
                    {
                        if skill == Skill::Fire {
                            total_damage += u64::from(amount);
                        }
                        enemies_defeated += u32::from(enemy_defeated);
                    }
                }
                Move::Swap { from, to } => {
                    casts_this_turn = 0;
                    session.tap_cell(from, observer);
                    if let TapOutcome::Resolved(report) = session.tap_cell(to, observer) {
                        max_combo = max_combo.max(report.combo);
                        total_damage += u64::from(report.damage);
                        enemies_defeated += u32::from(report.enemy_defeated);
                    } else {
                        log::warn!("hinted swap {from} -> {to} did not resolve");
                        break Outcome::Stuck;
                    }
                }
            }
        };

        let result = GameResult {
            seed: session.seed(),
            turns: session.turn(),
            enemies_defeated,
            highest_level: session.enemy().level.max(level_at_start),
            max_combo,
            total_damage,
            outcome,
        };
        log::debug!(
            "seed {} finished: {} after {} turns, level {}",
            result.seed,
            result.outcome,
            result.turns,
            result.highest_level
        );
        result
    }
}

/// Play one headless game from `seed`.
///
/// # Errors
///
/// Returns an error if the config is not playable.
pub fn play_game(config: GameConfig, seed: u64, max_turns: u32) -> Result<GameResult, ConfigError> {
    let mut session = GameSession::new(config, seed)?;
    Ok(Autoplayer::new(max_turns).play(&mut session, &mut ()))
}

/// Aggregate statistics over many games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Games played.
    pub games_played: u64,
    /// Games ending in defeat.
    pub defeated: u64,
    /// Games reaching the turn cap.
    pub survived: u64,
    /// Games ending with no move.
    pub stuck: u64,
    /// Sum of turns over all games.
    pub total_turns: u64,
    /// Sum of enemies defeated over all games.
    pub total_enemies_defeated: u64,
    /// Sum of damage over all games.
    pub total_damage: u64,
    /// Longest cascade in any game.
    pub max_combo: u32,
    /// Highest enemy level reached, and the seed that reached it.
    pub best: Option<(u32, u64)>,
}

impl BatchStats {
    /// Create empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one game into the totals.
    pub fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        match result.outcome {
            Outcome::Defeated => self.defeated += 1,
            Outcome::Survived => self.survived += 1,
            Outcome::Stuck => self.stuck += 1,
        }
        self.total_turns += u64::from(result.turns);
        self.total_enemies_defeated += u64::from(result.enemies_defeated);
        self.total_damage += result.total_damage;
        self.max_combo = self.max_combo.max(result.max_combo);
        self.offer_best(result.highest_level, result.seed);
    }

    /// Merge stats from another thread.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.defeated += other.defeated;
        self.survived += other.survived;
        self.stuck += other.stuck;
        self.total_turns += other.total_turns;
        self.total_enemies_defeated += other.total_enemies_defeated;
        self.total_damage += other.total_damage;
        self.max_combo = self.max_combo.max(other.max_combo);
        if let Some((level, seed)) = other.best {
            self.offer_best(level, seed);
        }
    }

    /// Ties go to the lower seed so merge order does not matter.
    fn offer_best(&mut self, level: u32, seed: u64) {
        let better = match self.best {
            None => true,
            Some((best_level, best_seed)) => {
                level > best_level || (level == best_level && seed < best_seed)
            }
        };
        if better {
            self.best = Some((level, seed));
        }
    }

    /// Mean turns per game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }

    /// Mean enemies defeated per game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_enemies_defeated(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_enemies_defeated as f64 / self.games_played as f64
    }
}

/// Play `games` headless games in parallel, seeds `base_seed..`.
///
/// Results do not depend on thread count.
///
/// # Errors
///
/// Returns an error if the config is not playable.
pub fn simulate(
    config: GameConfig,
    base_seed: u64,
    games: u64,
    max_turns: u32,
) -> Result<BatchStats, ConfigError> {
    config.validate()?;
    log::info!("simulating {games} games from seed {base_seed}");

    // Each thread accumulates its own stats, merged at the end.
    let stats = (0..games)
        .into_par_iter()
        .fold(BatchStats::new, |mut local, i| {
            let seed = base_seed.wrapping_add(i);
            if let Ok(result) = play_game(config, seed, max_turns) {
                local.add_result(&result);
            }
            local
        })
        .reduce(BatchStats::new, |mut a, b| {
            a.merge(&b);
            a
        });

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Combat};

    #[test]
    fn test_play_game_is_deterministic() {
        let a = play_game(GameConfig::default(), 5, 40).unwrap();
        let b = play_game(GameConfig::default(), 5, 40).unwrap();
        assert_eq!(a, b);
        assert!(a.turns <= 40);
    }

    #[test]
    fn test_turn_cap_respected() {
        let result = play_game(GameConfig::default(), 1, 3).unwrap();
        assert!(result.turns <= 3);
        assert_ne!(result.outcome, Outcome::Defeated);
    }

    #[test]
    fn test_dead_board_is_stuck() {
        let config = GameConfig::default();
        let board: Board = "RGB\nYPH\nBRG".parse().unwrap();
        let mut session = GameSession::resume(config, 0, board, Combat::new(&config)).unwrap();
        let result = Autoplayer::new(10).play(&mut session, &mut ());
        assert_eq!(result.outcome, Outcome::Stuck);
        assert_eq!(result.turns, 0);
    }

    #[test]
    fn test_policy_priorities() {
        let config = GameConfig::default();
        let board: Board = "RRB\nGBR\nBGG".parse().unwrap();

        let mut combat = Combat::new(&config);
        combat.hero.hp = 30;
        combat.hero.sp = 100;
        let session = GameSession::resume(config, 0, board.clone(), combat).unwrap();
        assert_eq!(Autoplayer::decide(&session, true), Some(Move::Cast(Skill::Heal)));

        combat.hero.hp = 100;
        combat.enemy.hp = 20;
        let session = GameSession::resume(config, 0, board.clone(), combat).unwrap();
        assert_eq!(Autoplayer::decide(&session, true), Some(Move::Cast(Skill::Fire)));

        combat.enemy.hp = 120;
        let session = GameSession::resume(config, 0, board.clone(), combat).unwrap();
        assert_eq!(Autoplayer::decide(&session, true), Some(Move::Cast(Skill::Buff)));
        assert!(matches!(
            Autoplayer::decide(&session, false),
            Some(Move::Swap { .. })
        ));
    }

    #[test]
    fn test_simulate_counts_every_game() {
        let stats = simulate(GameConfig::default(), 100, 8, 20).unwrap();
        assert_eq!(stats.games_played, 8);
        assert_eq!(stats.defeated + stats.survived + stats.stuck, 8);
        assert!(stats.best.is_some());
    }

    #[test]
    fn test_merge_matches_sequential() {
        let results: Vec<_> = (0..4)
            .map(|seed| play_game(GameConfig::default(), seed, 10).unwrap())
            .collect();

        let mut sequential = BatchStats::new();
        for r in &results {
            sequential.add_result(r);
        }

        let mut left = BatchStats::new();
        let mut right = BatchStats::new();
        left.add_result(&results[0]);
        left.add_result(&results[1]);
        right.add_result(&results[2]);
        right.add_result(&results[3]);
        right.merge(&left);

        assert_eq!(right, sequential);
    }
}
