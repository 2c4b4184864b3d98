//! The 4×4 tile grid and the slide/merge rules that act on it.
//!
//! All four move directions share one traversal: each line is read from the
//! edge the tiles slide toward, merged, and written back in the same order.
//! Only the order in which cells are visited differs between directions (see
//! [`Direction::line`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// Width and height of the board.
pub const SIZE: usize = 4;

/// Largest tile a caller may place; a 4×4 game cannot build anything bigger.
pub const MAX_TILE: u32 = 1 << 17;

/// Plain row-major cell values, `rows[row][col]`.
pub type Rows = [[u32; SIZE]; SIZE];

/// Returned when a caller-supplied grid breaks the tile invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) holds {value}, which is neither empty nor a power of two")]
    InvalidTile { row: usize, col: usize, value: u32 },
    #[error("cell ({row}, {col}) holds {value}, above the largest tile {MAX_TILE}")]
    TileTooLarge { row: usize, col: usize, value: u32 },
}

/// The tile grid.
///
/// Empty cells are 0, tiles hold their value (2, 4, 8, ...). Every cell is
/// either 0 or a power of two; the only ways to build a board from outside
/// the crate go through validation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Rows", into = "Rows")]
pub struct Board {
    cells: Rows,
}

/// Outcome of sliding a board in one direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    /// Whether any cell changed value or position.
    pub moved: bool,
    /// The value produced by each merge, in traversal order.
    pub merges: Vec<u32>,
}

impl Slide {
    /// Points earned by this slide: the sum of all merge results.
    pub fn reward(&self) -> u64 {
        self.merges.iter().map(|&v| u64::from(v)).sum()
    }
}

impl Board {
    pub const EMPTY: Board = Board {
        cells: [[0; SIZE]; SIZE],
    };

    /// Build a board from row-major values, rejecting any cell that is not
    /// 0 or a power of two between 2 and [`MAX_TILE`].
    pub fn from_rows(rows: Rows) -> Result<Board, BoardError> {
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value != 0 && (value < 2 || !value.is_power_of_two()) {
                    return Err(BoardError::InvalidTile { row, col, value });
                }
                if value > MAX_TILE {
                    return Err(BoardError::TileTooLarge { row, col, value });
                }
            }
        }
        Ok(Board { cells: rows })
    }

    /// Copy of the cell values.
    pub fn rows(&self) -> Rows {
        self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        debug_assert!(value == 0 || (value >= 2 && value.is_power_of_two()));
        self.cells[row][col] = value;
    }

    /// Coordinates of every empty cell, in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|&(_, _, value)| value == 0)
            .map(|(row, col, _)| (row, col))
            .collect()
    }

    /// Number of occupied cells.
    pub fn tile_count(&self) -> usize {
        self.iter().filter(|&(_, _, value)| value != 0).count()
    }

    /// Largest value currently on the board (0 if empty).
    pub fn highest_tile(&self) -> u32 {
        self.iter().map(|(_, _, value)| value).max().unwrap_or(0)
    }

    pub fn has_empty_cell(&self) -> bool {
        self.iter().any(|(_, _, value)| value == 0)
    }

    /// Whether two orthogonally adjacent cells hold the same non-zero value.
    pub fn has_adjacent_pair(&self) -> bool {
        self.iter().any(|(row, col, value)| {
            value != 0
                && ((col + 1 < SIZE && self.cells[row][col + 1] == value)
                    || (row + 1 < SIZE && self.cells[row + 1][col] == value))
        })
    }

    /// Whether any move is still possible.
    ///
    /// This is direction-agnostic: an empty cell or an equal adjacent pair in
    /// either orientation means some direction changes the board.
    pub fn can_move(&self) -> bool {
        self.has_empty_cell() || self.has_adjacent_pair()
    }

    /// Whether sliding in `direction` would change the board.
    pub fn can_slide(&self, direction: Direction) -> bool {
        let mut probe = *self;
        probe.slide(direction).moved
    }

    /// Slide and merge every line toward the edge named by `direction`.
    pub fn slide(&mut self, direction: Direction) -> Slide {
        let mut slide = Slide::default();

        for index in 0..SIZE {
            let coords = direction.line(index);
            let mut line = coords.map(|(row, col)| self.cells[row][col]);
            merge_line(&mut line, &mut slide.merges);

            for (&(row, col), &value) in coords.iter().zip(line.iter()) {
                if self.cells[row][col] != value {
                    slide.moved = true;
                    self.cells[row][col] = value;
                }
            }
        }

        slide
    }

    fn iter(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(col, &value)| (row, col, value))
        })
    }
}

impl TryFrom<Rows> for Board {
    type Error = BoardError;

    fn try_from(rows: Rows) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Rows {
    fn from(board: Board) -> Self {
        board.cells
    }
}

/// Merge a line whose index 0 is the leading edge.
///
/// Tiles are packed toward index 0, equal neighbours are combined once per
/// pass scanning from the leading edge, and the result is packed again.
/// A tile produced by a merge does not merge again in the same pass, and a
/// pair whose sum would exceed [`MAX_TILE`] stays apart.
fn merge_line(line: &mut [u32; SIZE], merges: &mut Vec<u32>) {
    compress(line);

    for i in 0..SIZE - 1 {
        if line[i] == 0 || line[i] != line[i + 1] {
            continue;
        }
        if let Some(doubled) = line[i].checked_mul(2).filter(|&v| v <= MAX_TILE) {
            line[i] = doubled;
            merges.push(doubled);
            line[i + 1] = 0;
        }
    }

    compress(line);
}

/// Move all non-zero values to the front, keeping their order.
fn compress(line: &mut [u32; SIZE]) {
    let mut write = 0;
    for read in 0..SIZE {
        if line[read] != 0 {
            if write != read {
                line[write] = line[read];
                line[read] = 0;
            }
            write += 1;
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for values in &self.cells {
            for &value in values {
                if value == 0 {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", value)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+------+------+------+------+")?;
        for values in &self.cells {
            write!(f, "|")?;
            for &value in values {
                if value == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", value)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
