//! The board engine: owns one game's grid, score and milestones and applies
//! move commands to them.

use std::fmt;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::direction::Direction;
use crate::milestone::Milestones;
use crate::state::GameState;

/// Probability that a spawned tile is a 2 rather than a 4.
const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Result of executing a step (move) in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the board changed (and a new tile was spawned).
    pub moved: bool,
    /// Points earned from merges in this move.
    pub reward: u64,
    /// Number of merges performed.
    pub merges: usize,
    /// Whether the game is over after this step.
    pub game_over: bool,
}

/// A single game session.
///
/// Generic over the random source that places new tiles, so replays and
/// tests can pin the spawn sequence. `Game::new(seed)` uses a seeded
/// [`SmallRng`].
#[derive(Clone)]
pub struct Game<R = SmallRng> {
    board: Board,
    score: u64,
    max_tile: u32,
    game_over: bool,
    won: bool,
    milestones: Milestones,
    rng: R,
}

impl Game<SmallRng> {
    /// Create a new game with the given seed.
    ///
    /// The game starts with two random tiles (90% chance of 2, 10% chance of 4).
    pub fn new(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    /// Reset with a freshly seeded random source.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
        self.reset();
    }
}

impl<R: Rng> Game<R> {
    /// Create a new game drawing spawns from `rng`.
    pub fn with_rng(rng: R) -> Self {
        let mut game = Self::from_board(Board::EMPTY, rng);
        game.spawn_tile();
        game.spawn_tile();
        game
    }

    /// Start from an existing position without spawning anything.
    ///
    /// Score, max tile and milestones start from zero as in a new game, and
    /// the game is not over until a move produces a stuck board.
    pub fn from_board(board: Board, rng: R) -> Self {
        Game {
            board,
            score: 0,
            max_tile: 0,
            game_over: false,
            won: false,
            milestones: Milestones::new(),
            rng,
        }
    }

    /// Reset the game to the state of a freshly constructed one, with two
    /// new random tiles. The random source keeps its position.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.score = 0;
        self.max_tile = 0;
        self.game_over = false;
        self.won = false;
        self.milestones = Milestones::new();
        self.spawn_tile();
        self.spawn_tile();
        debug!("game reset");
    }

    /// Execute a move in the given direction.
    ///
    /// If the move doesn't change the board, nothing else happens: no tile
    /// is spawned and the score stays put. Once the game is over every step
    /// is rejected.
    pub fn step(&mut self, direction: Direction) -> StepResult {
        if self.game_over {
            return StepResult {
                moved: false,
                reward: 0,
                merges: 0,
                game_over: true,
            };
        }

        let slide = self.board.slide(direction);
        if !slide.moved {
            return StepResult {
                moved: false,
                reward: 0,
                merges: 0,
                game_over: false,
            };
        }

        for &value in &slide.merges {
            self.score += u64::from(value);
            self.raise_max_tile(value);
        }

        self.spawn_tile();

        if !self.board.can_move() {
            self.game_over = true;
            debug!(
                "game over: score={} max_tile={}",
                self.score, self.max_tile
            );
        }

        StepResult {
            moved: true,
            reward: slide.reward(),
            merges: slide.merges.len(),
            game_over: self.game_over,
        }
    }

    /// Move in `direction`; true if the board changed.
    pub fn play(&mut self, direction: Direction) -> bool {
        self.step(direction).moved
    }

    /// Move by direction token (`"Left"`, `"ArrowLeft"`, ...).
    ///
    /// Unrecognized tokens are ignored and return false.
    pub fn play_token(&mut self, token: &str) -> bool {
        match token.parse::<Direction>() {
            Ok(direction) => self.play(direction),
            Err(err) => {
                debug!("ignoring move: {err}");
                false
            }
        }
    }

    /// Place a 2 (90%) or a 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns the cell and value placed, or None if the board is full.
    pub fn spawn_tile(&mut self) -> Option<(usize, usize, u32)> {
        let empty = self.board.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let (row, col) = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen::<f64>() < SPAWN_TWO_PROBABILITY {
            2
        } else {
            4
        };
        self.board.set(row, col, value);
        Some((row, col, value))
    }

    fn raise_max_tile(&mut self, value: u32) {
        if value <= self.max_tile {
            return;
        }
        self.max_tile = value;
        for threshold in self.milestones.record(value) {
            debug!("milestone {threshold} reached");
        }
    }
}

impl<R> Game<R> {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Sum of all merge results since the game started.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Highest tile produced by a merge this game (0 before the first merge).
    pub fn max_tile(&self) -> u32 {
        self.max_tile
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Always false; kept for the snapshot shape.
    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn milestones(&self) -> &Milestones {
        &self.milestones
    }

    /// Which of [Up, Down, Left, Right] would change the board.
    pub fn legal_directions(&self) -> [bool; 4] {
        if self.game_over {
            return [false; 4];
        }
        Direction::all().map(|direction| self.board.can_slide(direction))
    }

    /// Independent copy of the current state.
    pub fn state(&self) -> GameState {
        GameState {
            board: self.board.rows(),
            score: self.score,
            max_tile: self.max_tile,
            game_over: self.game_over,
            won: self.won,
            milestones: self.milestones.to_map(),
        }
    }
}

impl<R> fmt::Debug for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("score", &self.score)
            .field("max_tile", &self.max_tile)
            .field("game_over", &self.game_over)
            .field("milestones", &self.milestones)
            .field("board", &self.board)
            .finish()
    }
}

impl<R> fmt::Display for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}   Max tile: {}", self.score, self.max_tile)?;
        write!(f, "{}", self.board)
    }
}

// =============================================================================
// Tests
// =============================================================================
