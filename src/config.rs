//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Feed
//! paths are resolved relative to `data_dir` unless absolute.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cost::CostModel;
use crate::types::Game;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub costs: CostModel,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub refresh_interval_secs: u64,
}

/// Where the CSV feeds live on disk.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedsConfig {
    /// Base directory prepended to relative feed paths.
    pub data_dir: PathBuf,
    /// Master draw-history feed, one per game.
    pub loto_master: PathBuf,
    pub loto3_master: PathBuf,
    pub loto4_master: PathBuf,
    pub racha_master: PathBuf,
    /// Prediction export (all games in one file).
    pub simulations: PathBuf,
    /// Recorded-plays export.
    pub plays: PathBuf,
}

impl FeedsConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn master_path(&self, game: Game) -> PathBuf {
        let raw = match game {
            Game::Loto => &self.loto_master,
            Game::Loto3 => &self.loto3_master,
            Game::Loto4 => &self.loto4_master,
            Game::Racha => &self.racha_master,
        };
        self.resolve(raw)
    }

    pub fn simulations_path(&self) -> PathBuf {
        self.resolve(&self.simulations)
    }

    pub fn plays_path(&self) -> PathBuf {
        self.resolve(&self.plays)
    }
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
[engine]
refresh_interval_secs = 300

[feeds]
data_dir = "data"
loto_master = "loto_historial.csv"
loto3_master = "loto3_historial.csv"
loto4_master = "loto4_historial.csv"
racha_master = "racha_historial.csv"
simulations = "simulaciones.csv"
plays = "jugadas.csv"

[costs]
loto = 1200
"#;

    #[test]
    fn test_parse_sample() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.engine.refresh_interval_secs, 300);
        assert_eq!(config.costs.loto, dec!(1200));
        // Unspecified costs fall back to defaults
        assert_eq!(config.costs.loto3_sub_bet, dec!(100));
    }

    #[test]
    fn test_costs_section_is_optional() {
        let trimmed = SAMPLE.split("[costs]").next().unwrap();
        let config: AppConfig = toml::from_str(trimmed).unwrap();
        assert_eq!(config.costs, CostModel::default());
    }

    #[test]
    fn test_relative_paths_resolve_under_data_dir() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(
            config.feeds.master_path(Game::Loto),
            PathBuf::from("data/loto_historial.csv")
        );
        assert_eq!(
            config.feeds.simulations_path(),
            PathBuf::from("data/simulaciones.csv")
        );
    }

    #[test]
    fn test_absolute_paths_pass_through() {
        let mut config: AppConfig = toml::from_str(SAMPLE).unwrap();
        config.feeds.plays = PathBuf::from("/var/feeds/jugadas.csv");
        assert_eq!(
            config.feeds.plays_path(),
            PathBuf::from("/var/feeds/jugadas.csv")
        );
    }
}
