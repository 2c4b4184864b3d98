//! # Milestone 2048 Core Engine
//!
//! The rules of a 4×4 tile-merging puzzle: sliding and merging, random tile
//! spawns, game-over detection and sticky score milestones (2048, 4096,
//! 8192). The engine is synchronous and does no I/O; callers drive it with
//! direction commands and render from [`GameState`] snapshots.
//!
//! Entitlement to play and reward claims are tracked by callers. The engine
//! only reports which milestones were reached.
//!
//! ## Example
//!
//! ```rust
//! use milestone_2048_core::{Direction, Game};
//!
//! let mut game = Game::new(42); // seeded spawns
//! let moved = game.play(Direction::Left);
//! let state = game.state();
//! println!("moved={moved} score={} max={}", state.score, state.max_tile);
//! assert!(!game.play_token("Diagonal")); // unknown tokens are ignored
//! ```

pub mod board;
pub mod direction;
pub mod game;
pub mod milestone;
pub mod state;

pub use board::{Board, BoardError, Rows, Slide, MAX_TILE, SIZE};
pub use direction::{Direction, ParseDirectionError};
pub use game::{Game, StepResult};
pub use milestone::{Milestones, THRESHOLDS};
pub use state::GameState;
