//! Board, positions and orbs.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::BoardParseError;

/// A position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    /// Row, counted from the top.
    pub row: usize,
    /// Column, counted from the left.
    pub col: usize,
}

impl Pos {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether `other` is orthogonally adjacent (Manhattan distance 1).
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Orb color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orb {
    /// Red orb.
    Red = 0,
    /// Blue orb.
    Blue = 1,
    /// Green orb.
    Green = 2,
    /// Yellow orb.
    Yellow = 3,
    /// Purple orb.
    Purple = 4,
    /// Heart orb.
    Heart = 5,
}

impl Orb {
    /// Every color, in index order.
    pub const PALETTE: [Self; 6] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Heart,
    ];

    /// Draw a uniformly random orb from the first `colors` palette entries.
    pub fn random<R: Rng>(rng: &mut R, colors: u8) -> Self {
        let colors = usize::from(colors).clamp(1, Self::PALETTE.len());
        Self::PALETTE[rng.gen_range(0..colors)]
    }

    /// Single-letter name used by the text form of a board.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Blue => 'B',
            Self::Green => 'G',
            Self::Yellow => 'Y',
            Self::Purple => 'P',
            Self::Heart => 'H',
        }
    }

    /// Inverse of [`Orb::letter`] (case-insensitive).
    #[must_use]
    pub const fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'R' => Some(Self::Red),
            'B' => Some(Self::Blue),
            'G' => Some(Self::Green),
            'Y' => Some(Self::Yellow),
            'P' => Some(Self::Purple),
            'H' => Some(Self::Heart),
            _ => None,
        }
    }
}

/// A rectangular grid of orb slots.
///
/// Slots never move; only their contents change. `None` marks a slot
/// emptied by a match and not yet refilled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Orb>>,
}

impl Board {
    /// Create an all-empty board.
    #[must_use]
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Deal a fresh board with no run of `min_match` or more.
    ///
    /// Cells are filled row by row, left to right. Each cell is resampled
    /// while the `min_match - 1` cells to its left, or above it, all hold the
    /// candidate. Only those neighbors are committed yet, so no backtracking
    /// is needed. Terminates as long as `colors >= 3`.
    pub fn generate<R: Rng>(
        rows: usize,
        cols: usize,
        colors: u8,
        min_match: usize,
        rng: &mut R,
    ) -> Self {
        let mut board = Self::empty(rows, cols);
        let span = min_match.saturating_sub(1).max(1);

        for row in 0..rows {
            for col in 0..cols {
                let orb = loop {
                    let candidate = Orb::random(rng, colors);
                    let row_run = col >= span
                        && (col - span..col).all(|c| board.get(Pos::new(row, c)) == Some(candidate));
                    let col_run = row >= span
                        && (row - span..row).all(|r| board.get(Pos::new(r, col)) == Some(candidate));
                    if !row_run && !col_run {
                        break candidate;
                    }
                };
                board.set(Pos::new(row, col), Some(orb));
            }
        }

        board
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `pos` lies on the board.
    #[must_use]
    pub const fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    const fn index(&self, pos: Pos) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Orb at `pos`, or `None` if the slot is empty or off the board.
    #[must_use]
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Orb> {
        if self.contains(pos) {
            self.cells[self.index(pos)]
        } else {
            None
        }
    }

    /// Set the contents of a slot. Off-board positions are ignored.
    #[inline]
    pub fn set(&mut self, pos: Pos, orb: Option<Orb>) {
        if self.contains(pos) {
            let idx = self.index(pos);
            self.cells[idx] = orb;
        }
    }

    /// Exchange the contents of two slots.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        if self.contains(a) && self.contains(b) {
            let (ia, ib) = (self.index(a), self.index(b));
            self.cells.swap(ia, ib);
        }
    }

    /// Empty every listed slot.
    pub fn clear<'a>(&mut self, positions: impl IntoIterator<Item = &'a Pos>) {
        for &pos in positions {
            self.set(pos, None);
        }
    }

    /// Number of empty slots.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Let orbs fall and refill the gaps.
    ///
    /// Each column is compacted toward the bottom keeping relative order,
    /// then the empties left at the top are filled with random orbs. Refills
    /// are not checked for runs; new matches feed the next cascade pass.
    pub fn collapse_and_refill<R: Rng>(&mut self, colors: u8, rng: &mut R) {
        for col in 0..self.cols {
            let mut write = self.rows;
            for row in (0..self.rows).rev() {
                if let Some(orb) = self.get(Pos::new(row, col)) {
                    write -= 1;
                    self.set(Pos::new(write, col), Some(orb));
                }
            }
            for row in 0..write {
                self.set(Pos::new(row, col), Some(Orb::random(rng, colors)));
            }
        }
    }

    /// Iterate all slots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Option<Orb>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &orb)| (Pos::new(i / self.cols, i % self.cols), orb))
    }

    /// Board contents as rows of slots.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Option<Orb>>> {
        if self.cols == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.cols).map(<[_]>::to_vec).collect()
    }
}

impl fmt::Display for Board {
    /// One line per row; orbs by letter, empty slots as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ch = self.get(Pos::new(row, col)).map_or('.', Orb::letter);
                write!(f, "{ch}")?;
            }
            if row + 1 < self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parse the text form produced by `Display`. Blank lines and
    /// surrounding whitespace are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(BoardParseError::Empty);
        };
        let cols = first.chars().count();
        let mut board = Self::empty(lines.len(), cols);

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(BoardParseError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let orb = if ch == '.' {
                    None
                } else {
                    Some(Orb::from_letter(ch).ok_or(BoardParseError::UnknownOrb { row, col, ch })?)
                };
                board.set(Pos::new(row, col), orb);
            }
        }

        Ok(board)
    }
}
