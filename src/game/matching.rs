//! Match detection.
//!
//! Rows are scanned before columns. A cell that sits in both a horizontal and
//! a vertical run is reported once, in the first group that saw it, so
//! removing every returned group never clears a cell twice.

use std::collections::HashSet;

use crate::game::{Board, Pos};

/// One detected run after deduplication.
pub type MatchGroup = Vec<Pos>;

/// Find every run of `min_match` or more equal orbs.
///
/// Empty slots never match. Groups left empty by deduplication are dropped.
#[must_use]
pub fn find_matches(board: &Board, min_match: usize) -> Vec<MatchGroup> {
    let min_match = min_match.max(1);
    let mut runs: Vec<MatchGroup> = Vec::new();

    for row in 0..board.rows() {
        let line = (0..board.cols()).map(|col| Pos::new(row, col));
        collect_runs(board, min_match, line, &mut runs);
    }
    for col in 0..board.cols() {
        let line = (0..board.rows()).map(|row| Pos::new(row, col));
        collect_runs(board, min_match, line, &mut runs);
    }

    let mut seen = HashSet::new();
    runs.into_iter()
        .map(|run| run.into_iter().filter(|pos| seen.insert(*pos)).collect::<MatchGroup>())
        .filter(|group| !group.is_empty())
        .collect()
}

/// Whether the board holds any run of `min_match` or more.
#[must_use]
pub fn has_match(board: &Board, min_match: usize) -> bool {
    !find_matches(board, min_match).is_empty()
}

/// Total number of cells across groups.
#[must_use]
pub fn matched_cells(groups: &[MatchGroup]) -> usize {
    groups.iter().map(Vec::len).sum()
}

/// Scan one line of cells and push every qualifying run.
fn collect_runs(
    board: &Board,
    min_match: usize,
    line: impl Iterator<Item = Pos>,
    runs: &mut Vec<MatchGroup>,
) {
    let mut current: MatchGroup = Vec::new();
    let mut current_orb = None;

    for pos in line {
        let orb = board.get(pos);
        if orb.is_some() && orb == current_orb {
            current.push(pos);
        } else {
            if current.len() >= min_match && current_orb.is_some() {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
            current.push(pos);
            current_orb = orb;
        }
    }
    if current.len() >= min_match && current_orb.is_some() {
        runs.push(current);
    }
}
