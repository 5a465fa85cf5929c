//! Combat resolution.
//!
//! All arithmetic is integer. Percent-based bonuses are applied as
//! `value * (100 + percent) / 100`, which floors exactly where the reference
//! rules call for `floor(value * (1 + percent / 100))`.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// The player's combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    /// Current HP.
    pub hp: u32,
    /// Maximum HP.
    pub max_hp: u32,
    /// Skill points, in `0..=max_sp`.
    pub sp: u32,
    /// SP cap.
    pub max_sp: u32,
    /// Damage settlements left on the active buff (0 = no buff).
    pub buff_turns: u32,
    /// Static damage multiplier applied at settlement.
    pub damage_multiplier: u32,
}

impl Hero {
    /// Fresh hero at full HP and zero SP.
    #[must_use]
    pub const fn new(config: &GameConfig) -> Self {
        Self {
            hp: config.player_max_hp,
            max_hp: config.player_max_hp,
            sp: 0,
            max_sp: config.max_sp,
            buff_turns: 0,
            damage_multiplier: 1,
        }
    }

    /// Whether a damage buff is active.
    #[must_use]
    pub const fn is_buffed(&self) -> bool {
        self.buff_turns > 0
    }

    /// Whether HP is above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose up to `amount` HP. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restore up to `amount` HP without exceeding max. Returns HP restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += restored;
        restored
    }

    /// Gain SP, clamped at the cap. Returns SP actually gained.
    pub fn gain_sp(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_sp.saturating_sub(self.sp));
        self.sp += gained;
        gained
    }

    /// Spend `cost` SP if available.
    ///
    /// Returns `false` and leaves SP untouched when the hero cannot pay.
    pub fn spend_sp(&mut self, cost: u32) -> bool {
        if self.sp < cost {
            return false;
        }
        self.sp -= cost;
        true
    }
}

/// The current opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// Current HP.
    pub hp: u32,
    /// Maximum HP.
    pub max_hp: u32,
    /// Flat damage dealt each enemy turn.
    pub atk: u32,
    /// Level, starting at 1.
    pub level: u32,
}

impl Enemy {
    /// Spawn an enemy at full HP for the given level.
    ///
    /// HP and ATK grow linearly: each level past the first adds
    /// `enemy_scale_percent` of the base values.
    #[must_use]
    pub fn at_level(level: u32, config: &GameConfig) -> Self {
        let level = level.max(1);
        let max_hp = scaled(config.enemy_base_hp, level, config.enemy_scale_percent);
        Self {
            hp: max_hp,
            max_hp,
            atk: scaled(config.enemy_base_atk, level, config.enemy_scale_percent),
            level,
        }
    }

    /// The enemy that replaces this one once it is defeated.
    #[must_use]
    pub fn next(&self, config: &GameConfig) -> Self {
        Self::at_level(self.level.saturating_add(1), config)
    }

    /// Whether HP has reached zero.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Lose up to `amount` HP. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }
}

/// `floor(base * (1 + percent/100 * (level - 1)))` in integer arithmetic.
#[must_use]
pub fn scaled(base: u32, level: u32, percent: u32) -> u32 {
    let factor = 100 + u64::from(percent) * u64::from(level.saturating_sub(1));
    clamp_u32(u64::from(base) * factor / 100)
}

/// Damage banked by one cascade pass.
///
/// `combo` is the pass's own combo step, already incremented, so the first
/// pass of a resolution cycle receives one step of bonus.
#[must_use]
pub fn pass_damage(removed: usize, combo: u32, config: &GameConfig) -> u32 {
    let bonus = 100 + u64::from(config.combo_bonus_percent) * u64::from(combo);
    let base = (removed as u64).saturating_mul(u64::from(config.orb_damage));
    clamp_u32(base.saturating_mul(bonus) / 100)
}

/// SP earned by removing `removed` orbs, before the cap is applied.
#[must_use]
pub fn orb_sp(removed: usize, config: &GameConfig) -> u32 {
    clamp_u32((removed as u64).saturating_mul(u64::from(config.sp_per_orb)))
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// What a damage settlement did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Damage computed from the banked total and multipliers.
    pub damage: u32,
    /// Whether the buff multiplier applied.
    pub buffed: bool,
    /// Whether this settlement used up the last buff turn.
    pub buff_expired: bool,
    /// Whether the enemy is now at zero HP.
    pub enemy_defeated: bool,
}

/// Outcome of the enemy's attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyAttack {
    /// HP the hero lost.
    pub damage: u32,
    /// Whether the hero is now at zero HP.
    pub hero_defeated: bool,
}

/// Hero and enemy state for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combat {
    /// The player's combatant.
    pub hero: Hero,
    /// The current enemy.
    pub enemy: Enemy,
}

impl Combat {
    /// Fresh combat: full-HP hero against a level 1 enemy.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            hero: Hero::new(config),
            enemy: Enemy::at_level(1, config),
        }
    }

    /// Apply the damage banked by a resolution cycle.
    ///
    /// The buff doubles (by `buff.multiplier`) the whole banked total and is
    /// consumed by this settlement whether or not any damage was dealt.
    pub fn settle(&mut self, pending: u32, config: &GameConfig) -> Settlement {
        let buffed = self.hero.is_buffed();
        let multiplier = if buffed { config.buff.multiplier } else { 1 };
        let total = u64::from(pending)
            * u64::from(self.hero.damage_multiplier)
            * u64::from(multiplier);
        let damage = clamp_u32(total);

        if damage > 0 {
            self.enemy.take_damage(damage);
        }

        let mut buff_expired = false;
        if buffed {
            self.hero.buff_turns -= 1;
            buff_expired = self.hero.buff_turns == 0;
        }

        Settlement {
            damage,
            buffed,
            buff_expired,
            enemy_defeated: self.enemy.is_defeated(),
        }
    }

    /// The enemy hits the hero for its flat attack value.
    pub fn enemy_attack(&mut self) -> EnemyAttack {
        let damage = self.hero.take_damage(self.enemy.atk);
        EnemyAttack {
            damage,
            hero_defeated: !self.hero.is_alive(),
        }
    }

    /// Replace a defeated enemy with the next level's.
    pub fn advance_enemy(&mut self, config: &GameConfig) -> Enemy {
        self.enemy = self.enemy.next(config);
        self.enemy
    }
}
