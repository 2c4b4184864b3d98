//! Invariant sweeps over many seeded games.

use milestone_2048_core::{Direction, Game, THRESHOLDS};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const GAMES: u64 = 40;
const MAX_STEPS: usize = 3000;

fn random_direction(rng: &mut SmallRng) -> Direction {
    Direction::all()[rng.gen_range(0..4)]
}

fn nonzero(game: &Game) -> usize {
    game.board().tile_count()
}

#[test]
fn cells_are_always_empty_or_powers_of_two() {
    for seed in 0..GAMES {
        let mut game = Game::new(seed);
        let mut policy = SmallRng::seed_from_u64(seed + 10_000);
        for _ in 0..MAX_STEPS {
            game.play(random_direction(&mut policy));
            let state = game.state();
            assert!(
                state
                    .board
                    .iter()
                    .flatten()
                    .all(|&v| v == 0 || v.is_power_of_two()),
                "seed {seed}: {:?}",
                game.board()
            );
            if game.is_over() {
                break;
            }
        }
    }
}

#[test]
fn score_and_tile_count_follow_each_step() {
    for seed in 0..GAMES {
        let mut game = Game::new(seed);
        let mut policy = SmallRng::seed_from_u64(seed + 20_000);
        for _ in 0..MAX_STEPS {
            let before_score = game.score();
            let before_tiles = nonzero(&game);
            let before_max = game.max_tile();
            let before_milestones = *game.milestones();

            let result = game.step(random_direction(&mut policy));

            if result.moved {
                assert_eq!(game.score(), before_score + result.reward);
                // a move always leaves at least one empty cell for the spawn
                assert_eq!(nonzero(&game), before_tiles - result.merges + 1);
            } else {
                assert_eq!(game.score(), before_score);
                assert_eq!(nonzero(&game), before_tiles);
            }

            assert!(game.max_tile() >= before_max);
            for threshold in THRESHOLDS {
                if before_milestones.is_reached(threshold) {
                    assert!(game.milestones().is_reached(threshold));
                }
            }

            if game.is_over() {
                break;
            }
        }
    }
}

#[test]
fn finished_games_reject_every_move() {
    let mut finished = 0;
    for seed in 0..GAMES {
        let mut game = Game::new(seed);
        let mut policy = SmallRng::seed_from_u64(seed + 30_000);
        let mut steps = 0;
        while !game.is_over() && steps < 20_000 {
            game.play(random_direction(&mut policy));
            steps += 1;
        }
        if !game.is_over() {
            continue;
        }
        finished += 1;

        assert!(!game.board().can_move());
        let before = game.state();
        for direction in Direction::all() {
            assert!(!game.play(direction));
        }
        assert_eq!(game.state(), before);
    }
    assert!(finished > 0, "no random game reached a terminal board");
}

#[test]
fn reset_restores_a_fresh_game() {
    for seed in 0..GAMES {
        let mut game = Game::new(seed);
        let mut policy = SmallRng::seed_from_u64(seed + 40_000);
        for _ in 0..200 {
            game.play(random_direction(&mut policy));
        }

        game.reset();
        let state = game.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.max_tile, 0);
        assert!(!state.game_over);
        assert!(!state.won);
        assert!(state.milestones.values().all(|&reached| !reached));

        let tiles: Vec<u32> = state.board.iter().flatten().copied().filter(|&v| v != 0).collect();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().all(|&v| v == 2 || v == 4));
    }
}

#[test]
fn max_tile_tracks_largest_merge() {
    for seed in 0..GAMES {
        let mut game = Game::new(seed);
        let mut policy = SmallRng::seed_from_u64(seed + 50_000);
        for _ in 0..MAX_STEPS {
            game.play(random_direction(&mut policy));
            // spawned tiles never exceed 4, so anything larger came from a merge
            let highest = game.board().highest_tile();
            if highest > 4 {
                assert!(game.max_tile() >= highest);
            }
            if game.is_over() {
                break;
            }
        }
    }
}
