//! Read-only view of a session for renderers.

use serde::{Deserialize, Serialize};

use crate::game::{Enemy, Hero, Orb, Phase, Pos};

/// Everything needed to draw a session at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Cells row by row; `None` is an empty cell.
    pub board: Vec<Vec<Option<Orb>>>,
    /// Selected cell.
    pub selection: Option<Pos>,
    /// Turn phase.
    pub phase: Phase,
    /// Combo count of the current or most recent resolution.
    pub combo: u32,
    /// The hero.
    pub hero: Hero,
    /// The current enemy.
    pub enemy: Enemy,
    /// Whether input is locked.
    pub input_locked: bool,
    /// Whether the game is over.
    pub game_over: bool,
    /// Productive swaps resolved since the last (re)start.
    pub turn: u32,
    /// Event messages, most recent first.
    pub log: Vec<String>,
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::game::GameSession;

    #[test]
    fn test_snapshot_mirrors_session() {
        let session = GameSession::new(GameConfig::default(), 9).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.board.len(), 5);
        assert!(snap.board.iter().all(|row| row.len() == 6));
        assert_eq!(snap.hero, *session.hero());
        assert_eq!(snap.log, vec!["Game start!".to_string()]);

        let json = serde_json::to_string(&snap).unwrap();
        let back: super::Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
