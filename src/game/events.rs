//! Player-facing event feed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Skill;

/// Something worth telling the player about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new game began.
    GameStarted,
    /// An adjacent swap produced no match and was undone.
    SwapWasted,
    /// One cascade pass removed orbs.
    OrbsCleared {
        /// Combo step of the pass.
        combo: u32,
        /// Orbs removed.
        removed: u32,
        /// Damage banked by the pass.
        damage: u32,
        /// SP gained.
        sp: u32,
    },
    /// Settled damage hit the enemy.
    EnemyDamaged {
        /// Damage dealt.
        damage: u32,
    },
    /// The buff was activated.
    BuffActivated,
    /// The buff ran out.
    BuffExpired,
    /// A skill was cast.
    SkillCast {
        /// Which skill.
        skill: Skill,
        /// HP restored or damage dealt (0 for buff).
        amount: u32,
    },
    /// A new enemy appeared.
    EnemySpawned {
        /// Its level.
        level: u32,
        /// Its max HP.
        hp: u32,
        /// Its attack.
        atk: u32,
    },
    /// The enemy hit the hero.
    EnemyAttacked {
        /// Damage taken.
        damage: u32,
    },
    /// The hero fell; the game is over.
    Defeated,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::GameStarted => write!(f, "Game start!"),
            Self::SwapWasted => write!(f, "No match, swap undone"),
            Self::OrbsCleared {
                combo,
                removed,
                damage,
                sp,
            } => write!(f, "Combo {combo}: cleared {removed} orbs, +{damage} damage, +{sp} SP"),
            Self::EnemyDamaged { damage } => write!(f, "Dealt {damage} damage"),
            Self::BuffActivated => write!(f, "Rage! Next attack deals double damage"),
            Self::BuffExpired => write!(f, "Rage wore off"),
            Self::SkillCast {
                skill: Skill::Heal,
                amount,
            } => write!(f, "Heal restores {amount} HP"),
            Self::SkillCast {
                skill: Skill::Fire,
                amount,
            } => write!(f, "Fireball deals {amount} damage!"),
            Self::SkillCast {
                skill: Skill::Buff, ..
            } => write!(f, "Rage cast"),
            Self::EnemySpawned { level, hp, atk } => {
                write!(f, "A new monster appears! Level {level}, HP {hp}, ATK {atk}")
            }
            Self::EnemyAttacked { damage } => write!(f, "The monster hits you for {damage}!"),
            Self::Defeated => write!(f, "You were defeated. Game over"),
        }
    }
}

/// Entries an [`EventLog`] keeps by default.
pub const EVENT_LOG_CAPACITY: usize = 100;

/// Bounded event feed, read most recent first.
///
/// Once full, each new entry evicts the oldest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GameEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// Create an empty log holding up to [`EVENT_LOG_CAPACITY`] entries.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }

    /// Create an empty log holding up to `capacity` entries (at least one).
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: if capacity == 0 { 1 } else { capacity },
        }
    }

    /// Record an event, evicting the oldest if the log is full.
    pub fn push(&mut self, event: GameEvent) {
        log::debug!("event: {event}");
        if self.events.len() >= self.capacity {
            let excess = self.events.len() + 1 - self.capacity;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Most recent event.
    #[must_use]
    pub fn latest(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    /// Entries, most recent first.
    pub fn recent(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        self.events.iter().rev()
    }

    /// Entries in the order they happened.
    #[must_use]
    pub fn chronological(&self) -> &[GameEvent] {
        &self.events
    }
}
