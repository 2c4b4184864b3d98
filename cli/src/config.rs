//! Run settings: built-in defaults, optionally overridden by a TOML file,
//! overridden in turn by command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Random legal moves
    Random,
    /// Cycle through directions: Left, Down, Right, Up
    Cycle,
}

/// One source of settings. Unset fields defer to the next layer down.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub seed: Option<u64>,
    pub max_steps: Option<u32>,
    pub policy: Option<Policy>,
    pub plays: Option<u32>,
    pub claimed: Option<Vec<u32>>,
}

impl ConfigLayer {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub seed: u64,
    /// Maximum steps per episode (0 = unlimited)
    pub max_steps: u32,
    pub policy: Policy,
    /// Available plays; None means the gate is off.
    pub plays: Option<u32>,
    /// Milestones already claimed elsewhere.
    pub claimed: Vec<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: defaults::seed(),
            max_steps: defaults::max_steps(),
            policy: Policy::Random,
            plays: None,
            claimed: Vec::new(),
        }
    }
}

impl Settings {
    /// Merge layers; `cli` wins over `file`, which wins over the defaults.
    pub fn resolve(cli: ConfigLayer, file: ConfigLayer) -> Self {
        let base = Settings::default();
        Self {
            seed: cli.seed.or(file.seed).unwrap_or(base.seed),
            max_steps: cli.max_steps.or(file.max_steps).unwrap_or(base.max_steps),
            policy: cli.policy.or(file.policy).unwrap_or(base.policy),
            plays: cli.plays.or(file.plays),
            claimed: cli.claimed.or(file.claimed).unwrap_or(base.claimed),
        }
    }
}

mod defaults {
    pub fn seed() -> u64 { 42 }
    pub fn max_steps() -> u32 { 10_000 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_layers() {
        let settings = Settings::resolve(ConfigLayer::default(), ConfigLayer::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.max_steps, 10_000);
        assert_eq!(settings.plays, None);
    }

    #[test]
    fn test_parse_file_layer() {
        let layer: ConfigLayer = toml::from_str(
            r#"
            seed = 7
            policy = "cycle"
            plays = 3
            claimed = [2048]
            "#,
        )
        .unwrap();
        assert_eq!(layer.seed, Some(7));
        assert_eq!(layer.policy, Some(Policy::Cycle));
        assert_eq!(layer.plays, Some(3));
        assert_eq!(layer.claimed, Some(vec![2048]));
        assert_eq!(layer.max_steps, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<ConfigLayer>("sead = 1").is_err());
        assert!(toml::from_str::<ConfigLayer>("policy = \"greedy\"").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ConfigLayer {
            seed: Some(7),
            max_steps: Some(50),
            plays: Some(0),
            claimed: Some(vec![2048, 4096]),
            ..ConfigLayer::default()
        };
        let cli = ConfigLayer {
            seed: Some(9),
            plays: Some(2),
            ..ConfigLayer::default()
        };
        let settings = Settings::resolve(cli, file);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.max_steps, 50);
        assert_eq!(settings.policy, Policy::Random);
        assert_eq!(settings.plays, Some(2));
        assert_eq!(settings.claimed, vec![2048, 4096]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ConfigLayer::from_toml("/nonexistent/milestone-2048.toml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/milestone-2048.toml"));
    }
}
