//! Owned snapshot of a game, as handed to rendering and claim logic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Rows;

/// Point-in-time copy of everything a caller may show or act on.
///
/// The snapshot owns its data; changing it has no effect on the game it
/// came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Rows,
    pub score: u64,
    pub max_tile: u32,
    pub game_over: bool,
    /// Reserved; no rule currently sets it.
    pub won: bool,
    /// Milestone threshold to reached flag.
    pub milestones: BTreeMap<u32, bool>,
}

impl GameState {
    /// Reached milestones that are absent from the caller's `claimed` list.
    pub fn claimable(&self, claimed: &[u32]) -> Vec<u32> {
        self.milestones
            .iter()
            .filter(|&(threshold, &reached)| reached && !claimed.contains(threshold))
            .map(|(&threshold, _)| threshold)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameState {
        GameState {
            board: [[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 4096, 0], [0, 0, 0, 4]],
            score: 45_000,
            max_tile: 4096,
            game_over: false,
            won: false,
            milestones: BTreeMap::from([(2048, true), (4096, true), (8192, false)]),
        }
    }

    #[test]
    fn test_json_shape_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["maxTile"], 4096);
        assert_eq!(json["gameOver"], false);
        assert_eq!(json["won"], false);
        assert_eq!(json["score"], 45_000);
        assert_eq!(json["board"][2][2], 4096);
        assert_eq!(json["milestones"]["2048"], true);
        assert_eq!(json["milestones"]["8192"], false);
    }

    #[test]
    fn test_json_round_trip_keeps_milestones() {
        let state = sample();
        let text = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&text).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_claimable() {
        let state = sample();
        assert_eq!(state.claimable(&[]), vec![2048, 4096]);
        assert_eq!(state.claimable(&[4096]), vec![2048]);
    }
}
