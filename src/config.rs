//! Game configuration.
//!
//! Every rule constant lives here so a session can be tuned without touching
//! the engine. Defaults reproduce the reference ruleset: a 5×6 board of six
//! colors, a 100 HP hero and a level 1 enemy with 120 HP and 14 ATK.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::Orb;

/// Heal skill parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealSkill {
    /// SP cost.
    pub cost: u32,
    /// HP restored (clamped to max HP).
    pub amount: u32,
}

/// Fire skill parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireSkill {
    /// SP cost.
    pub cost: u32,
    /// Flat damage dealt to the enemy.
    pub damage: u32,
}

/// Buff skill parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffSkill {
    /// SP cost.
    pub cost: u32,
    /// Number of damage settlements the buff lasts.
    pub turns: u32,
    /// Damage multiplier while the buff is active.
    pub multiplier: u32,
}

/// Complete ruleset for a session.
///
/// Deserialization fills missing fields from [`GameConfig::default`], so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board rows.
    pub rows: usize,
    /// Board columns.
    pub cols: usize,
    /// Number of orb colors in play (3 to 6).
    pub colors: u8,
    /// Minimum run length that counts as a match.
    pub min_match: usize,
    /// Hero max HP.
    pub player_max_hp: u32,
    /// SP cap.
    pub max_sp: u32,
    /// Level 1 enemy HP.
    pub enemy_base_hp: u32,
    /// Level 1 enemy attack.
    pub enemy_base_atk: u32,
    /// Damage per removed orb before the combo bonus.
    pub orb_damage: u32,
    /// Extra damage per combo step, in percent.
    pub combo_bonus_percent: u32,
    /// SP gained per removed orb.
    pub sp_per_orb: u32,
    /// Heal skill.
    pub heal: HealSkill,
    /// Fire skill.
    pub fire: FireSkill,
    /// Buff skill.
    pub buff: BuffSkill,
    /// Enemy HP and ATK growth per level, in percent of the base values.
    pub enemy_scale_percent: u32,
    /// Pause between cascade animation steps, in milliseconds.
    pub step_delay_ms: u64,
    /// Upper bound on cascade passes in one resolution cycle.
    pub cascade_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 6,
            colors: 6,
            min_match: 3,
            player_max_hp: 100,
            max_sp: 100,
            enemy_base_hp: 120,
            enemy_base_atk: 14,
            orb_damage: 6,
            combo_bonus_percent: 25,
            sp_per_orb: 2,
            heal: HealSkill {
                cost: 25,
                amount: 30,
            },
            fire: FireSkill {
                cost: 40,
                damage: 50,
            },
            buff: BuffSkill {
                cost: 50,
                turns: 1,
                multiplier: 2,
            },
            enemy_scale_percent: 20,
            step_delay_ms: 120,
            cascade_limit: 1000,
        }
    }
}

/// Largest board side accepted by [`GameConfig::validate`].
pub const MAX_BOARD_SIDE: usize = 64;

impl GameConfig {
    /// Pause between cascade steps.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Check that the ruleset is playable.
    ///
    /// Fewer than three colors is rejected because board generation could
    /// then find no candidate that avoids both a row run and a column run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let palette = Orb::PALETTE.len();
        check("rows", self.rows as u64, 1, MAX_BOARD_SIDE as u64, "1..=64")?;
        check("cols", self.cols as u64, 1, MAX_BOARD_SIDE as u64, "1..=64")?;
        check("colors", u64::from(self.colors), 3, palette as u64, "3..=6")?;
        check("min_match", self.min_match as u64, 2, u64::MAX, ">= 2")?;
        check("player_max_hp", u64::from(self.player_max_hp), 1, u64::MAX, ">= 1")?;
        check("max_sp", u64::from(self.max_sp), 1, u64::MAX, ">= 1")?;
        check("enemy_base_hp", u64::from(self.enemy_base_hp), 1, u64::MAX, ">= 1")?;
        check("buff.multiplier", u64::from(self.buff.multiplier), 1, u64::MAX, ">= 1")?;
        check("cascade_limit", u64::from(self.cascade_limit), 1, u64::MAX, ">= 1")?;
        Ok(())
    }

    /// Load a config from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// describes an unplayable ruleset.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

fn check(
    field: &'static str,
    value: u64,
    min: u64,
    max: u64,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}
