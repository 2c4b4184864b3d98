//! # Milestone 2048 CLI
//!
//! Command-line driver for the board engine: play interactively in the
//! terminal or run headless simulations with a simple policy.

mod config;

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use milestone_2048_core::{Direction, Game};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use config::{ConfigLayer, Policy, Settings};

const HEADER: &str = "=== 2048 ===\nControls: WASD or Arrow Keys | Q to quit | R to restart\n";

#[derive(Parser, Debug)]
#[command(name = "milestone-2048")]
#[command(author, version, about = "Play 2048 in the terminal or run simulations")]
struct Args {
    /// Run in interactive mode (default if no other mode specified)
    #[arg(short, long)]
    interactive: bool,

    /// Number of episodes to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Random seed for deterministic runs [default: 42]
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum steps per episode, 0 = unlimited [default: 10000]
    #[arg(short, long)]
    max_steps: Option<u32>,

    /// Policy for headless mode [default: random]
    #[arg(short, long, value_enum)]
    policy: Option<Policy>,

    /// Available plays; moves are refused while this is 0 (no gate if omitted)
    #[arg(long)]
    plays: Option<u32>,

    /// Milestones already claimed, e.g. --claimed 2048,4096
    #[arg(long, value_delimiter = ',')]
    claimed: Vec<u32>,

    /// TOML file with defaults for seed, max_steps, policy, plays, claimed
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,

    /// Print each episode's final state as a JSON line in headless mode
    #[arg(long)]
    json: bool,
}

impl Args {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            seed: self.seed,
            max_steps: self.max_steps,
            policy: self.policy,
            plays: self.plays,
            claimed: (!self.claimed.is_empty()).then(|| self.claimed.clone()),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let file = match &args.config {
        Some(path) => ConfigLayer::from_toml(path)?,
        None => ConfigLayer::default(),
    };
    let settings = Settings::resolve(args.layer(), file);
    debug!("resolved settings: {settings:?}");

    match args.episodes {
        Some(episodes) if !args.interactive => run_headless(&args, &settings, episodes),
        _ => run_interactive(&settings),
    }
}

// =============================================================================
// Interactive mode
// =============================================================================

/// Run interactive mode where user plays with keyboard.
fn run_interactive(settings: &Settings) -> Result<()> {
    let _raw = RawMode::enable();

    let mut game = Game::new(settings.seed);
    render(&game, settings, None)?;
    play_keys(&mut game, settings, &mut io::stdin())
}

/// Apply key presses from `input` until the player quits or input ends.
fn play_keys(game: &mut Game, settings: &Settings, input: &mut impl Read) -> Result<()> {
    let mut buffer = [0u8; 3];

    loop {
        let bytes_read = input.read(&mut buffer).context("reading keyboard input")?;
        // end of input
        if bytes_read == 0 {
            break;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(direction) => {
                // Entitlement is checked here, never inside the engine.
                if settings.plays == Some(0) {
                    render(game, settings, Some("You need to buy a play attempt first!"))?;
                    continue;
                }
                let result = game.step(direction);
                if !result.moved {
                    continue;
                }
                let message = (result.reward > 0).then(|| format!("+{} points!", result.reward));
                render(game, settings, message.as_deref())?;
            }
            InputAction::Restart => {
                game.reset();
                render(game, settings, None)?;
            }
            InputAction::Quit => {
                println!("\nGoodbye!");
                break;
            }
            InputAction::None => {}
        }
    }

    Ok(())
}

fn render(game: &Game, settings: &Settings, message: Option<&str>) -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "\x1b[2J\x1b[H")?;
    writeln!(out, "{HEADER}")?;
    write!(out, "{game}")?;

    for line in milestone_lines(game, &settings.claimed) {
        writeln!(out, "  {line}")?;
    }
    if let Some(plays) = settings.plays {
        writeln!(out, "  Available plays: {plays}")?;
    }
    if let Some(message) = message {
        writeln!(out, "  {message}")?;
    }
    if game.is_over() {
        writeln!(out, "\n  *** GAME OVER ***")?;
        writeln!(out, "  Final Score: {}", game.score())?;
        writeln!(out, "  Max Tile: {}", game.max_tile())?;
        writeln!(out, "\n  Press R to restart or Q to quit")?;
    }
    out.flush().context("flushing terminal output")
}

/// One status line per milestone: not reached, claimable, or claimed.
fn milestone_lines(game: &Game, claimed: &[u32]) -> Vec<String> {
    let claimable = game.milestones().claimable(claimed);
    game.milestones()
        .iter()
        .map(|(threshold, reached)| {
            let status = if !reached {
                "not reached"
            } else if claimable.contains(&threshold) {
                "reached, claimable"
            } else {
                "reached, claimed"
            };
            format!("{threshold:>5}: {status}")
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Move(Direction),
    Restart,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // q, Ctrl+C, Esc
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit,
        [b'r'] | [b'R'] => InputAction::Restart,

        _ => InputAction::None,
    }
}

/// Puts the terminal in non-canonical, no-echo mode until dropped.
struct RawMode {
    #[cfg(unix)]
    saved: Option<libc::termios>,
}

#[cfg(unix)]
impl RawMode {
    fn enable() -> Self {
        use std::os::unix::io::AsRawFd;
        let fd = io::stdin().as_raw_fd();
        // SAFETY: termios is plain old data and fd is the process's stdin.
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut termios) != 0 {
                debug!("stdin is not a terminal, keeping line mode");
                return RawMode { saved: None };
            }
            let saved = termios;
            termios.c_lflag &= !(libc::ICANON | libc::ECHO);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;
            libc::tcsetattr(fd, libc::TCSANOW, &termios);
            RawMode { saved: Some(saved) }
        }
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        if let Some(saved) = self.saved {
            // SAFETY: restores the attributes read in `enable`.
            unsafe {
                libc::tcsetattr(io::stdin().as_raw_fd(), libc::TCSANOW, &saved);
            }
        }
    }
}

#[cfg(not(unix))]
impl RawMode {
    // Without raw mode each key needs Enter.
    fn enable() -> Self {
        RawMode {}
    }
}

// =============================================================================
// Headless mode
// =============================================================================

/// Final numbers of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Episode {
    score: u64,
    max_tile: u32,
    steps: u32,
}

#[derive(Debug, Clone, PartialEq)]
struct Summary {
    episodes: usize,
    avg_score: f64,
    median_score: f64,
    min_score: u64,
    max_score: u64,
    max_tile_overall: u32,
    tile_distribution: BTreeMap<u32, u32>,
    milestone_counts: BTreeMap<u32, u32>,
}

/// Run headless simulation mode.
fn run_headless(args: &Args, settings: &Settings, episodes: u32) -> Result<()> {
    let mut results = Vec::with_capacity(episodes as usize);
    let mut milestone_counts: BTreeMap<u32, u32> = BTreeMap::new();

    // Separate RNG for action selection so spawns stay tied to the game seed
    let mut action_rng = SmallRng::seed_from_u64(settings.seed.wrapping_add(1000));

    for episode in 0..episodes {
        let episode_seed = settings.seed.wrapping_add(u64::from(episode));
        let mut game = Game::new(episode_seed);
        let mut steps = 0;
        let mut cycle = 0;

        while !game.is_over() && (settings.max_steps == 0 || steps < settings.max_steps) {
            let action = match settings.policy {
                Policy::Random => select_random_action(&game, &mut action_rng),
                Policy::Cycle => select_cycle_action(&game, &mut cycle),
            };
            let Some(direction) = action else { break };

            game.play(direction);
            steps += 1;

            if args.verbose {
                println!("Episode {} Step {}: {}", episode + 1, steps, direction);
                print!("{game}");
            }
        }

        for (threshold, reached) in game.milestones().iter() {
            if reached {
                *milestone_counts.entry(threshold).or_insert(0) += 1;
            }
        }

        let result = Episode {
            score: game.score(),
            max_tile: game.board().highest_tile(),
            steps,
        };
        info!(
            "episode {}: score={} max_tile={} steps={}",
            episode + 1,
            result.score,
            result.max_tile,
            result.steps
        );
        if args.json {
            println!("{}", serde_json::to_string(&game.state())?);
        }
        results.push(result);
    }

    let Some(summary) = summarize(&results, milestone_counts) else {
        info!("no episodes to summarize");
        return Ok(());
    };
    print_summary(settings, &summary);
    Ok(())
}

fn summarize(results: &[Episode], milestone_counts: BTreeMap<u32, u32>) -> Option<Summary> {
    if results.is_empty() {
        return None;
    }

    let mut scores: Vec<u64> = results.iter().map(|r| r.score).collect();
    scores.sort_unstable();
    let n = scores.len();
    let median_score = if n % 2 == 0 {
        (scores[n / 2 - 1] + scores[n / 2]) as f64 / 2.0
    } else {
        scores[n / 2] as f64
    };

    let mut tile_distribution = BTreeMap::new();
    for result in results {
        *tile_distribution.entry(result.max_tile).or_insert(0) += 1;
    }

    Some(Summary {
        episodes: n,
        avg_score: scores.iter().sum::<u64>() as f64 / n as f64,
        median_score,
        min_score: scores[0],
        max_score: scores[n - 1],
        max_tile_overall: results.iter().map(|r| r.max_tile).max().unwrap_or(0),
        tile_distribution,
        milestone_counts,
    })
}

/// Print results in a parseable key=value format.
fn print_summary(settings: &Settings, summary: &Summary) {
    println!("=== Simulation Results ===");
    println!("episodes={}", summary.episodes);
    println!("policy={:?}", settings.policy);
    println!("seed={}", settings.seed);
    println!("max_steps={}", settings.max_steps);
    println!("avg_score={:.2}", summary.avg_score);
    println!("median_score={:.2}", summary.median_score);
    println!("min_score={}", summary.min_score);
    println!("max_score={}", summary.max_score);
    println!("max_tile_overall={}", summary.max_tile_overall);
    println!("tile_distribution={}", join_counts(&summary.tile_distribution));
    println!("milestones={}", join_counts(&summary.milestone_counts));
}

fn join_counts(counts: &BTreeMap<u32, u32>) -> String {
    counts
        .iter()
        .map(|(key, count)| format!("{key}:{count}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Select a random legal direction.
fn select_random_action(game: &Game, rng: &mut SmallRng) -> Option<Direction> {
    let legal = game.legal_directions();
    let valid: Vec<Direction> = Direction::all()
        .into_iter()
        .zip(legal)
        .filter_map(|(direction, ok)| ok.then_some(direction))
        .collect();

    if valid.is_empty() {
        None
    } else {
        Some(valid[rng.gen_range(0..valid.len())])
    }
}

/// Select directions in a cycle: Left, Down, Right, Up, skipping illegal ones.
fn select_cycle_action(game: &Game, cycle: &mut usize) -> Option<Direction> {
    const ORDER: [Direction; 4] = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];
    let legal = game.legal_directions();

    for _ in 0..ORDER.len() {
        let direction = ORDER[*cycle % ORDER.len()];
        *cycle += 1;
        if legal[direction as usize] {
            return Some(direction);
        }
    }

    None
}
