//! Productive swap search.

use serde::{Deserialize, Serialize};

use crate::game::{find_matches, matched_cells, Board, Pos};

/// An adjacent swap that would produce at least one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// First cell (the one nearer the top left).
    pub from: Pos,
    /// Its right or lower neighbour.
    pub to: Pos,
    /// Cells the first cascade pass would remove.
    pub matched: usize,
}

/// Every productive adjacent swap, in row-major order of `from` with the
/// rightward swap before the downward one.
#[must_use]
pub fn productive_swaps(board: &Board, min_match: usize) -> Vec<Hint> {
    let mut hints = Vec::new();
    let mut scratch = board.clone();

    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let from = Pos::new(row, col);
            for to in [Pos::new(row, col + 1), Pos::new(row + 1, col)] {
                if !board.contains(to) {
                    continue;
                }
                scratch.swap(from, to);
                let matched = matched_cells(&find_matches(&scratch, min_match));
                scratch.swap(from, to);
                if matched > 0 {
                    hints.push(Hint { from, to, matched });
                }
            }
        }
    }

    hints
}

/// The swap that clears the most cells on its first pass. Ties go to the
/// earliest in [`productive_swaps`] order.
#[must_use]
pub fn best_swap(board: &Board, min_match: usize) -> Option<Hint> {
    productive_swaps(board, min_match)
        .into_iter()
        .reduce(|best, hint| if hint.matched > best.matched { hint } else { best })
}
