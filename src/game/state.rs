//! Game session: the aggregate that owns board, combat and turn state.
//!
//! Every inbound event goes through a method here. Events arriving while
//! input is locked, outside the player phase or after game over are ignored
//! without touching state.

use std::fmt;
use std::mem;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::{
    assert_invariants, find_matches, has_match, matched_cells, orb_sp, pass_damage, Board, Combat,
    Enemy, EventLog, GameEvent, Hero, Observer, Pos, Skill, SkillOutcome, Snapshot, Step,
};

/// Turn phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for player input.
    #[default]
    Player,
    /// A cascade is being resolved.
    Resolving,
    /// The enemy is acting.
    Enemy,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "Your move",
            Self::Resolving => "Resolving",
            Self::Enemy => "Enemy turn",
        };
        f.write_str(name)
    }
}

/// Per-swap accumulator for the resolution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    /// Cascade passes that found a match.
    pub combo: u32,
    /// Damage banked and not yet settled.
    pub pending_damage: u32,
}

/// An inbound event, as stored in a session's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Tap a cell.
    Tap(Pos),
    /// Cast a skill.
    Cast(Skill),
    /// Start over.
    Restart,
}

/// What a productive swap led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnReport {
    /// Cascade passes that matched.
    pub combo: u32,
    /// Orbs removed over all passes.
    pub orbs_cleared: u32,
    /// Damage applied to the enemy at settlement.
    pub damage: u32,
    /// Whether the settlement defeated the enemy (and skipped its turn).
    pub enemy_defeated: bool,
    /// Damage the enemy dealt, if it got a turn.
    pub enemy_attack: Option<u32>,
    /// Whether the hero fell.
    pub game_over: bool,
}

/// Result of a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapOutcome {
    /// Input not accepted right now, or off the board.
    Ignored,
    /// First cell of a swap chosen.
    Selected,
    /// Selected cell tapped again.
    Deselected,
    /// A non-adjacent cell replaced the selection.
    Reselected,
    /// Adjacent swap made no match and was undone.
    Wasted,
    /// Adjacent swap matched; the turn was resolved.
    Resolved(TurnReport),
}

/// A complete game.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    seed: u64,
    rng: ChaCha8Rng,
    board: Board,
    selection: Option<Pos>,
    phase: Phase,
    input_locked: bool,
    game_over: bool,
    resolution: Resolution,
    combat: Combat,
    log: EventLog,
    history: Vec<Action>,
    turn: u32,
}

impl GameSession {
    /// Start a new game dealt from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is not playable.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let board = deal(&config, &mut rng);
        Ok(Self::assemble(config, seed, rng, board, Combat::new(&config)))
    }

    /// Start a new game and report the dealt board to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is not playable.
    pub fn start<O: Observer>(
        config: GameConfig,
        seed: u64,
        observer: &mut O,
    ) -> Result<Self, ConfigError> {
        let session = Self::new(config, seed)?;
        observer.on_step(Step::Deal, &session);
        Ok(session)
    }

    /// Resume from a given board and combat state.
    ///
    /// The config's board dimensions are taken from `board`. Refills draw
    /// from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting config is not playable.
    pub fn resume(
        mut config: GameConfig,
        seed: u64,
        board: Board,
        combat: Combat,
    ) -> Result<Self, ConfigError> {
        config.rows = board.rows();
        config.cols = board.cols();
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(Self::assemble(config, seed, rng, board, combat))
    }

    fn assemble(
        config: GameConfig,
        seed: u64,
        rng: ChaCha8Rng,
        board: Board,
        combat: Combat,
    ) -> Self {
        let mut log = EventLog::new();
        log.push(GameEvent::GameStarted);
        Self {
            config,
            seed,
            rng,
            board,
            selection: None,
            phase: Phase::Player,
            input_locked: false,
            game_over: false,
            resolution: Resolution::default(),
            combat,
            log,
            history: Vec::new(),
            turn: 0,
        }
    }

    // ==================== ACCESSORS ====================

    /// Ruleset in use.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed the session was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Currently selected cell.
    #[must_use]
    pub const fn selection(&self) -> Option<Pos> {
        self.selection
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Combo count of the current or most recent resolution cycle.
    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.resolution.combo
    }

    /// Damage banked by the resolution cycle in progress.
    #[must_use]
    pub const fn pending_damage(&self) -> u32 {
        self.resolution.pending_damage
    }

    /// Hero and enemy.
    #[must_use]
    pub const fn combat(&self) -> &Combat {
        &self.combat
    }

    /// The hero.
    #[must_use]
    pub const fn hero(&self) -> &Hero {
        &self.combat.hero
    }

    /// The current enemy.
    #[must_use]
    pub const fn enemy(&self) -> &Enemy {
        &self.combat.enemy
    }

    /// Event feed.
    #[must_use]
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    /// Accepted inbound events since the session was created.
    #[must_use]
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Productive swaps resolved since the last (re)start.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Whether the hero has fallen.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Whether input is locked (resolving, enemy turn, or game over).
    #[must_use]
    pub const fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    /// Whether a tap or skill would be considered right now.
    #[must_use]
    pub const fn accepts_input(&self) -> bool {
        matches!(self.phase, Phase::Player) && !self.input_locked && !self.game_over
    }

    /// Read-only copy of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.to_rows(),
            selection: self.selection,
            phase: self.phase,
            combo: self.resolution.combo,
            hero: self.combat.hero,
            enemy: self.combat.enemy,
            input_locked: self.input_locked,
            game_over: self.game_over,
            turn: self.turn,
            log: self.log.recent().map(ToString::to_string).collect(),
        }
    }

    // ==================== INBOUND EVENTS ====================

    /// Apply a recorded action.
    pub fn apply<O: Observer>(&mut self, action: Action, observer: &mut O) {
        match action {
            Action::Tap(pos) => {
                self.tap_cell(pos, observer);
            }
            Action::Cast(skill) => {
                self.cast(skill, observer);
            }
            Action::Restart => self.restart(observer),
        }
    }

    /// Start over with a fresh board, hero and level 1 enemy.
    ///
    /// The random stream continues, so a restart deals a different board.
    pub fn restart<O: Observer>(&mut self, observer: &mut O) {
        self.history.push(Action::Restart);
        self.board = deal(&self.config, &mut self.rng);
        self.combat = Combat::new(&self.config);
        self.selection = None;
        self.phase = Phase::Player;
        self.input_locked = false;
        self.game_over = false;
        self.resolution = Resolution::default();
        self.turn = 0;
        self.log.clear();
        self.log.push(GameEvent::GameStarted);
        log::info!("session restarted (seed {})", self.seed);
        observer.on_step(Step::Deal, self);
        assert_invariants(self);
    }

    /// Handle a tap on `pos`.
    ///
    /// The first tap selects; tapping the selection again clears it; tapping
    /// a non-adjacent cell moves the selection there. Tapping an adjacent
    /// cell tries a swap, which is undone if it makes no match.
    pub fn tap_cell<O: Observer>(&mut self, pos: Pos, observer: &mut O) -> TapOutcome {
        if !self.accepts_input() || !self.board.contains(pos) {
            return TapOutcome::Ignored;
        }
        self.history.push(Action::Tap(pos));

        let outcome = match self.selection {
            None => {
                self.selection = Some(pos);
                observer.on_step(Step::Selection, self);
                TapOutcome::Selected
            }
            Some(selected) if selected == pos => {
                self.selection = None;
                observer.on_step(Step::Selection, self);
                TapOutcome::Deselected
            }
            Some(selected) if !selected.is_adjacent(pos) => {
                self.selection = Some(pos);
                observer.on_step(Step::Selection, self);
                TapOutcome::Reselected
            }
            Some(selected) => self.try_swap(selected, pos, observer),
        };

        assert_invariants(self);
        outcome
    }

    /// Cast a heal.
    pub fn cast_heal<O: Observer>(&mut self, observer: &mut O) -> SkillOutcome {
        self.cast(Skill::Heal, observer)
    }

    /// Cast a fireball.
    pub fn cast_fire<O: Observer>(&mut self, observer: &mut O) -> SkillOutcome {
        self.cast(Skill::Fire, observer)
    }

    /// Cast the damage buff.
    pub fn cast_buff<O: Observer>(&mut self, observer: &mut O) -> SkillOutcome {
        self.cast(Skill::Buff, observer)
    }

    /// Cast `skill` if it is the player's phase and SP covers the cost.
    ///
    /// Skills never change the phase and never give the enemy a turn.
    pub fn cast<O: Observer>(&mut self, skill: Skill, observer: &mut O) -> SkillOutcome {
        if !self.accepts_input() {
            return SkillOutcome::Ignored;
        }
        if !self.combat.hero.spend_sp(skill.cost(&self.config)) {
            return SkillOutcome::Unaffordable;
        }
        self.history.push(Action::Cast(skill));

        let mut enemy_defeated = false;
        let amount = match skill {
            Skill::Heal => {
                let restored = self.combat.hero.heal(self.config.heal.amount);
                self.log.push(GameEvent::SkillCast { skill, amount: restored });
                restored
            }
            Skill::Fire => {
                let dealt = self.combat.enemy.take_damage(self.config.fire.damage);
                self.log.push(GameEvent::SkillCast { skill, amount: dealt });
                enemy_defeated = self.combat.enemy.is_defeated();
                dealt
            }
            Skill::Buff => {
                self.combat.hero.buff_turns = self.config.buff.turns;
                self.log.push(GameEvent::BuffActivated);
                0
            }
        };
        observer.on_step(Step::SkillCast, self);

        if enemy_defeated {
            self.spawn_next_enemy(observer);
        }

        assert_invariants(self);
        SkillOutcome::Cast {
            amount,
            enemy_defeated,
        }
    }

    // ==================== TURN RESOLUTION ====================

    fn try_swap<O: Observer>(&mut self, a: Pos, b: Pos, observer: &mut O) -> TapOutcome {
        self.input_locked = true;
        self.board.swap(a, b);
        observer.on_step(Step::Swapped, self);

        if !has_match(&self.board, self.config.min_match) {
            self.board.swap(a, b);
            self.selection = None;
            self.input_locked = false;
            self.log.push(GameEvent::SwapWasted);
            observer.on_step(Step::Reverted, self);
            return TapOutcome::Wasted;
        }

        self.selection = None;
        self.phase = Phase::Resolving;
        let orbs_cleared = self.resolve_matches(observer);
        let mut report = self.settle(observer);
        report.orbs_cleared = orbs_cleared;
        TapOutcome::Resolved(report)
    }

    /// Run cascade passes until one finds nothing. Returns orbs removed.
    fn resolve_matches<O: Observer>(&mut self, observer: &mut O) -> u32 {
        let delay = self.config.step_delay();
        self.resolution = Resolution::default();
        observer.pause(delay);

        let mut cleared = 0u32;
        loop {
            if self.resolution.combo >= self.config.cascade_limit {
                log::warn!(
                    "cascade limit {} reached; ending resolution",
                    self.config.cascade_limit
                );
                break;
            }

            let groups = find_matches(&self.board, self.config.min_match);
            if groups.is_empty() {
                break;
            }

            self.resolution.combo += 1;
            let combo = self.resolution.combo;
            let removed = matched_cells(&groups);
            let damage = pass_damage(removed, combo, &self.config);
            self.resolution.pending_damage = self.resolution.pending_damage.saturating_add(damage);
            let sp = self.combat.hero.gain_sp(orb_sp(removed, &self.config));
            self.board.clear(groups.iter().flatten());

            let removed = u32::try_from(removed).unwrap_or(u32::MAX);
            cleared = cleared.saturating_add(removed);
            log::debug!("combo {combo}: {} groups, {removed} orbs, +{damage} dmg, +{sp} sp", groups.len());
            self.log.push(GameEvent::OrbsCleared {
                combo,
                removed,
                damage,
                sp,
            });
            observer.on_step(Step::Cleared, self);
            observer.pause(delay);

            self.board.collapse_and_refill(self.config.colors, &mut self.rng);
            observer.on_step(Step::Refilled, self);
            observer.pause(delay);
        }

        cleared
    }

    /// Apply banked damage, then either grant the extra turn for a kill or
    /// run the enemy's attack.
    fn settle<O: Observer>(&mut self, observer: &mut O) -> TurnReport {
        let pending = mem::take(&mut self.resolution.pending_damage);
        let settlement = self.combat.settle(pending, &self.config);
        self.turn += 1;

        if settlement.damage > 0 {
            self.log.push(GameEvent::EnemyDamaged {
                damage: settlement.damage,
            });
        }
        if settlement.buff_expired {
            self.log.push(GameEvent::BuffExpired);
        }
        log::info!(
            "turn {}: combo {} dealt {} (buffed: {})",
            self.turn,
            self.resolution.combo,
            settlement.damage,
            settlement.buffed
        );
        observer.on_step(Step::Settled, self);

        let mut report = TurnReport {
            combo: self.resolution.combo,
            damage: settlement.damage,
            enemy_defeated: settlement.enemy_defeated,
            ..TurnReport::default()
        };

        if settlement.enemy_defeated {
            self.spawn_next_enemy(observer);
            self.phase = Phase::Player;
            self.input_locked = false;
            return report;
        }

        let damage = self.enemy_turn(observer);
        report.enemy_attack = Some(damage);
        report.game_over = self.game_over;
        report
    }

    fn enemy_turn<O: Observer>(&mut self, observer: &mut O) -> u32 {
        self.phase = Phase::Enemy;
        let attack = self.combat.enemy_attack();
        if attack.hero_defeated {
            // Lock before anything else can observe the fallen hero.
            self.game_over = true;
            self.input_locked = true;
        }
        self.log.push(GameEvent::EnemyAttacked {
            damage: attack.damage,
        });
        observer.on_step(Step::EnemyAttacked, self);

        if self.game_over {
            self.log.push(GameEvent::Defeated);
            log::info!(
                "hero defeated on turn {} by level {} enemy",
                self.turn,
                self.combat.enemy.level
            );
            observer.on_step(Step::GameOver, self);
        } else {
            self.phase = Phase::Player;
            self.input_locked = false;
        }
        attack.damage
    }

    fn spawn_next_enemy<O: Observer>(&mut self, observer: &mut O) {
        let enemy = self.combat.advance_enemy(&self.config);
        log::info!("level {} enemy spawned ({} HP, {} ATK)", enemy.level, enemy.max_hp, enemy.atk);
        self.log.push(GameEvent::EnemySpawned {
            level: enemy.level,
            hp: enemy.max_hp,
            atk: enemy.atk,
        });
        observer.on_step(Step::EnemySpawned, self);
    }
}

fn deal(config: &GameConfig, rng: &mut ChaCha8Rng) -> Board {
    Board::generate(config.rows, config.cols, config.colors, config.min_match, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::StepRecorder;

    /// Board where swapping (0,2) and (1,2) completes `RRR` on the top row.
    const SETUP: &str = "RRBGYP\nGYRHBG\nBGYPHR\nYPHRGB\nHBGYPH";

    fn session_with(board: &str, seed: u64) -> GameSession {
        let config = GameConfig::default();
        GameSession::resume(config, seed, board.parse().unwrap(), Combat::new(&config)).unwrap()
    }

    /// Find a seed whose refill after the first swap does not cascade.
    fn single_pass_seed() -> u64 {
        (0..200)
            .find(|&seed| {
                let mut s = session_with(SETUP, seed);
                s.tap_cell(Pos::new(0, 2), &mut ());
                matches!(
                    s.tap_cell(Pos::new(1, 2), &mut ()),
                    TapOutcome::Resolved(TurnReport { combo: 1, .. })
                )
            })
            .unwrap()
    }

    #[test]
    fn test_new_session_defaults() {
        let s = GameSession::new(GameConfig::default(), 1).unwrap();
        assert_eq!(s.phase(), Phase::Player);
        assert_eq!(s.hero().hp, 100);
        assert_eq!(s.enemy().hp, 120);
        assert_eq!(s.enemy().atk, 14);
        assert_eq!(s.enemy().level, 1);
        assert!(s.accepts_input());
        assert!(!has_match(s.board(), 3));
        assert_eq!(s.log().latest(), Some(&GameEvent::GameStarted));
    }

    #[test]
    fn test_start_reports_deal() {
        let mut rec = StepRecorder::default();
        let s = GameSession::start(GameConfig::default(), 1, &mut rec).unwrap();
        assert_eq!(rec.steps, vec![Step::Deal]);
        assert_eq!(rec.pauses, 0);
        assert_eq!(s.board(), GameSession::new(GameConfig::default(), 1).unwrap().board());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            colors: 1,
            ..GameConfig::default()
        };
        assert!(GameSession::new(config, 0).is_err());
    }

    #[test]
    fn test_selection_rules() {
        let mut s = session_with(SETUP, 0);
        assert_eq!(s.tap_cell(Pos::new(2, 2), &mut ()), TapOutcome::Selected);
        assert_eq!(s.selection(), Some(Pos::new(2, 2)));
        assert_eq!(s.tap_cell(Pos::new(2, 2), &mut ()), TapOutcome::Deselected);
        assert_eq!(s.selection(), None);

        s.tap_cell(Pos::new(0, 0), &mut ());
        assert_eq!(s.tap_cell(Pos::new(3, 3), &mut ()), TapOutcome::Reselected);
        assert_eq!(s.selection(), Some(Pos::new(3, 3)));
    }

    #[test]
    fn test_off_board_tap_ignored() {
        let mut s = session_with(SETUP, 0);
        assert_eq!(s.tap_cell(Pos::new(9, 9), &mut ()), TapOutcome::Ignored);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_wasted_swap_reverts() {
        let mut s = session_with(SETUP, 0);
        let before = s.board().clone();
        s.tap_cell(Pos::new(4, 0), &mut ());
        assert_eq!(s.tap_cell(Pos::new(4, 1), &mut ()), TapOutcome::Wasted);

        assert_eq!(s.board(), &before);
        assert_eq!(s.selection(), None);
        assert_eq!(s.phase(), Phase::Player);
        assert!(s.accepts_input());
        assert_eq!(s.hero().sp, 0);
        assert_eq!(s.enemy().hp, 120);
        assert_eq!(s.turn(), 0);
        assert_eq!(s.log().latest(), Some(&GameEvent::SwapWasted));
    }

    #[test]
    fn test_single_match_turn() {
        let seed = single_pass_seed();
        let mut s = session_with(SETUP, seed);
        s.tap_cell(Pos::new(0, 2), &mut ());
        let outcome = s.tap_cell(Pos::new(1, 2), &mut ());

        let TapOutcome::Resolved(report) = outcome else {
            panic!("expected resolution, got {outcome:?}");
        };
        assert_eq!(report.combo, 1);
        assert_eq!(report.orbs_cleared, 3);
        assert_eq!(report.damage, 22);
        assert_eq!(report.enemy_attack, Some(14));
        assert!(!report.enemy_defeated);
        assert!(!report.game_over);

        assert_eq!(s.enemy().hp, 98);
        assert_eq!(s.hero().hp, 86);
        assert_eq!(s.hero().sp, 6);
        assert_eq!(s.phase(), Phase::Player);
        assert!(s.accepts_input());
        assert_eq!(s.pending_damage(), 0);
        assert_eq!(s.turn(), 1);
    }

    #[test]
    fn test_kill_skips_enemy_turn() {
        let seed = single_pass_seed();
        let config = GameConfig::default();
        let mut combat = Combat::new(&config);
        combat.enemy.hp = 10;
        let mut s = GameSession::resume(config, seed, SETUP.parse().unwrap(), combat).unwrap();

        s.tap_cell(Pos::new(0, 2), &mut ());
        let TapOutcome::Resolved(report) = s.tap_cell(Pos::new(1, 2), &mut ()) else {
            panic!("expected resolution");
        };
        assert!(report.enemy_defeated);
        assert_eq!(report.enemy_attack, None);
        assert_eq!(s.enemy().level, 2);
        assert_eq!(s.enemy().hp, 144);
        assert_eq!(s.hero().hp, 100);
        assert_eq!(s.phase(), Phase::Player);
        assert!(s.accepts_input());
    }

    #[test]
    fn test_defeat_locks_input() {
        let config = GameConfig::default();
        let mut combat = Combat::new(&config);
        combat.hero.hp = 14;
        let mut s = GameSession::resume(config, 0, SETUP.parse().unwrap(), combat).unwrap();

        s.tap_cell(Pos::new(0, 2), &mut ());
        let TapOutcome::Resolved(report) = s.tap_cell(Pos::new(1, 2), &mut ()) else {
            panic!("expected resolution");
        };
        assert!(report.game_over);
        assert!(s.is_game_over());
        assert!(s.is_input_locked());
        assert_eq!(s.phase(), Phase::Enemy);
        assert_eq!(s.hero().hp, 0);
        assert_eq!(s.log().latest(), Some(&GameEvent::Defeated));

        // Everything is ignored afterwards.
        assert_eq!(s.tap_cell(Pos::new(0, 0), &mut ()), TapOutcome::Ignored);
        assert_eq!(s.cast_heal(&mut ()), SkillOutcome::Ignored);
    }

    #[test]
    fn test_restart_after_defeat() {
        let config = GameConfig::default();
        let mut combat = Combat::new(&config);
        combat.hero.hp = 1;
        let mut s = GameSession::resume(config, 0, SETUP.parse().unwrap(), combat).unwrap();
        s.tap_cell(Pos::new(0, 2), &mut ());
        s.tap_cell(Pos::new(1, 2), &mut ());
        assert!(s.is_game_over());

        let mut rec = StepRecorder::default();
        s.restart(&mut rec);
        assert_eq!(rec.steps, vec![Step::Deal]);
        assert!(!s.is_game_over());
        assert!(s.accepts_input());
        assert_eq!(s.hero().hp, 100);
        assert_eq!(s.enemy().level, 1);
        assert_eq!(s.turn(), 0);
        assert_eq!(s.log().len(), 1);
    }

    #[test]
    fn test_skills_need_sp() {
        let mut s = session_with(SETUP, 0);
        assert_eq!(s.cast_heal(&mut ()), SkillOutcome::Unaffordable);
        assert_eq!(s.cast_fire(&mut ()), SkillOutcome::Unaffordable);
        assert_eq!(s.cast_buff(&mut ()), SkillOutcome::Unaffordable);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_fire_kill_spawns_next_enemy() {
        let config = GameConfig::default();
        let mut combat = Combat::new(&config);
        combat.hero.sp = 40;
        combat.enemy.hp = 30;
        let mut s = GameSession::resume(config, 0, SETUP.parse().unwrap(), combat).unwrap();

        let outcome = s.cast_fire(&mut ());
        assert_eq!(
            outcome,
            SkillOutcome::Cast {
                amount: 30,
                enemy_defeated: true
            }
        );
        assert_eq!(s.hero().sp, 0);
        assert_eq!(s.enemy().level, 2);
        assert_eq!(s.enemy().hp, 144);
        assert_eq!(s.phase(), Phase::Player);
    }

    #[test]
    fn test_heal_and_buff() {
        let config = GameConfig::default();
        let mut combat = Combat::new(&config);
        combat.hero.sp = 100;
        combat.hero.hp = 50;
        let mut s = GameSession::resume(config, 0, SETUP.parse().unwrap(), combat).unwrap();

        assert!(s.cast_heal(&mut ()).is_cast());
        assert_eq!(s.hero().hp, 80);
        assert_eq!(s.hero().sp, 75);

        assert!(s.cast_buff(&mut ()).is_cast());
        assert_eq!(s.hero().buff_turns, 1);
        assert_eq!(s.hero().sp, 25);

        // Buff overwrites rather than stacking.
        s.combat.hero.sp = 50;
        s.cast_buff(&mut ());
        assert_eq!(s.hero().buff_turns, 1);
    }

    #[test]
    fn test_buff_doubles_settlement_and_expires() {
        let seed = single_pass_seed();
        let config = GameConfig::default();
        let mut combat = Combat::new(&config);
        combat.hero.buff_turns = 1;
        let mut s = GameSession::resume(config, seed, SETUP.parse().unwrap(), combat).unwrap();

        s.tap_cell(Pos::new(0, 2), &mut ());
        let TapOutcome::Resolved(report) = s.tap_cell(Pos::new(1, 2), &mut ()) else {
            panic!("expected resolution");
        };
        assert_eq!(report.damage, 44);
        assert_eq!(s.hero().buff_turns, 0);
        assert!(s.log().recent().any(|e| *e == GameEvent::BuffExpired));
    }

    #[test]
    fn test_observer_sees_steps_and_pauses() {
        let seed = single_pass_seed();
        let mut s = session_with(SETUP, seed);
        let mut rec = StepRecorder::default();
        s.tap_cell(Pos::new(0, 2), &mut rec);
        s.tap_cell(Pos::new(1, 2), &mut rec);

        assert_eq!(
            rec.steps,
            vec![
                Step::Selection,
                Step::Swapped,
                Step::Cleared,
                Step::Refilled,
                Step::Settled,
                Step::EnemyAttacked,
            ]
        );
        // One pause before the loop and two per pass.
        assert_eq!(rec.pauses, 3);
        assert_eq!(rec.paused, s.config().step_delay() * 3);
    }

    #[test]
    fn test_event_log_stays_bounded() {
        let mut s = session_with(SETUP, 0);
        for _ in 0..150 {
            s.tap_cell(Pos::new(4, 0), &mut ());
            s.tap_cell(Pos::new(4, 1), &mut ());
        }
        assert_eq!(s.log().len(), crate::game::EVENT_LOG_CAPACITY);
        assert_eq!(s.log().latest(), Some(&GameEvent::SwapWasted));
        assert_eq!(s.snapshot().log.len(), crate::game::EVENT_LOG_CAPACITY);
        // Replay needs every input, so history is not trimmed.
        assert_eq!(s.history().len(), 300);
    }

    #[test]
    fn test_history_records_accepted_events() {
        let mut s = session_with(SETUP, 0);
        s.tap_cell(Pos::new(0, 0), &mut ());
        s.tap_cell(Pos::new(0, 0), &mut ());
        s.cast_heal(&mut ());
        s.restart(&mut ());
        assert_eq!(
            s.history(),
            &[
                Action::Tap(Pos::new(0, 0)),
                Action::Tap(Pos::new(0, 0)),
                Action::Restart
            ]
        );
    }
}
