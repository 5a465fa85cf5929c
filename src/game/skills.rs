//! Skill identifiers and costs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// A player skill. Skills are free actions: they never end the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// Restore HP.
    Heal,
    /// Flat damage to the enemy.
    Fire,
    /// Multiply the next damage settlement.
    Buff,
}

impl Skill {
    /// Every skill, in menu order.
    pub const ALL: [Self; 3] = [Self::Heal, Self::Fire, Self::Buff];

    /// SP cost under `config`.
    #[must_use]
    pub const fn cost(self, config: &GameConfig) -> u32 {
        match self {
            Self::Heal => config.heal.cost,
            Self::Fire => config.fire.cost,
            Self::Buff => config.buff.cost,
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Heal => "heal",
            Self::Fire => "fire",
            Self::Buff => "buff",
        };
        f.write_str(name)
    }
}

/// Result of a skill request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillOutcome {
    /// Not the player's phase, input locked, or game over.
    Ignored,
    /// Not enough SP.
    Unaffordable,
    /// The skill took effect.
    Cast {
        /// HP restored or damage dealt (0 for buff).
        amount: u32,
        /// Whether the cast defeated the enemy.
        enemy_defeated: bool,
    },
}

impl SkillOutcome {
    /// Whether the skill took effect.
    #[must_use]
    pub const fn is_cast(&self) -> bool {
        matches!(self, Self::Cast { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_costs() {
        let cfg = GameConfig::default();
        assert_eq!(Skill::Heal.cost(&cfg), 25);
        assert_eq!(Skill::Fire.cost(&cfg), 40);
        assert_eq!(Skill::Buff.cost(&cfg), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Skill::Fire.to_string(), "fire");
    }
}
