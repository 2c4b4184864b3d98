//! Move directions and the tokens callers use to name them.

use std::fmt;
use std::str::FromStr;

use crate::board::SIZE;

/// The four directions a move can slide the tiles in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

/// Returned when a token does not name one of the four directions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized direction {0:?}")]
pub struct ParseDirectionError(pub String);

impl Direction {
    /// Get all four directions.
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Canonical name, as accepted by `from_str`.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }

    /// Coordinates of line `index`, ordered from the edge the tiles slide
    /// toward to the opposite edge.
    ///
    /// Left/Right walk rows, Up/Down walk columns; Right and Down are the
    /// mirrored walks of Left and Up.
    pub(crate) fn line(self, index: usize) -> [(usize, usize); SIZE] {
        std::array::from_fn(|step| {
            let back = SIZE - 1 - step;
            match self {
                Direction::Left => (index, step),
                Direction::Right => (index, back),
                Direction::Up => (step, index),
                Direction::Down => (back, index),
            }
        })
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts the canonical names and the browser `KeyboardEvent.key`
    /// names (`ArrowUp`, ...).
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.strip_prefix("Arrow").unwrap_or(token) {
            "Up" => Ok(Direction::Up),
            "Down" => Ok(Direction::Down),
            "Left" => Ok(Direction::Left),
            "Right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(token.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
