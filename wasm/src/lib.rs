//! # Milestone 2048 WebAssembly Bindings
//!
//! JavaScript-facing wrapper around the board engine. The browser UI forwards
//! raw `KeyboardEvent.key` values to `move`, renders from `getState`, and
//! keeps play entitlement and claim tracking on its own side.

use milestone_2048_core::Game;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// WebAssembly wrapper for one game session.
#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game with the given seed.
    ///
    /// The seed is a 64-bit integer (a `BigInt` on the JS side) used to
    /// initialize the deterministic spawn RNG.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WasmGame {
        WasmGame {
            game: Game::new(seed),
        }
    }

    /// Start over on the same instance with two fresh tiles.
    pub fn reset(&mut self) {
        self.game.reset();
    }

    /// Start over with a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.game.reseed(seed);
    }

    /// Move by direction token: `"Up"`, `"Down"`, `"Left"`, `"Right"` or the
    /// `Arrow*` key names.
    ///
    /// Returns false for unknown tokens, moves that change nothing, and any
    /// move after the game is over.
    #[wasm_bindgen(js_name = "move")]
    pub fn play(&mut self, token: &str) -> bool {
        self.game.play_token(token)
    }

    /// Snapshot as a plain JS object:
    /// `{ board, score, maxTile, gameOver, won, milestones }`.
    ///
    /// Milestones come out as an object keyed by threshold, not a `Map`.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> JsValue {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        self.game
            .state()
            .serialize(&serializer)
            .unwrap_or(JsValue::NULL)
    }

    /// Get the current score.
    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u64 {
        self.game.score()
    }

    /// Highest tile produced by a merge so far.
    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> u32 {
        self.game.max_tile()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.game.is_over()
    }

    /// Reached milestones not present in `claimed`.
    pub fn claimable(&self, claimed: Vec<u32>) -> Vec<u32> {
        self.game.milestones().claimable(&claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_creation() {
        let game = WasmGame::new(42);
        assert!(!game.is_game_over());
        assert_eq!(game.get_score(), 0);
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let mut game = WasmGame::new(42);
        assert!(!game.play("Escape"));
        assert_eq!(game.get_score(), 0);
    }

    #[test]
    fn test_nothing_claimable_at_start() {
        let game = WasmGame::new(1);
        assert!(game.claimable(vec![]).is_empty());
    }
}
