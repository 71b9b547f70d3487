//! Game configuration loaded from TOML.

use super::builder::BoardBuilder;
use super::game::{Game, GameError};
use super::types::Side;
use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// How the initial layout is produced.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LayoutKind {
    /// The fixed demo layout.
    #[default]
    Demo,
    /// Every piece on a random home tile.
    Random,
}

/// Settings for creating a new game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side that moves first.
    #[serde(default = "default_first_mover")]
    first_mover: Side,

    /// Layout generator.
    #[serde(default)]
    layout: LayoutKind,

    /// Seed for random layouts. Unseeded layouts use the thread RNG.
    #[serde(default)]
    seed: Option<u64>,
}

fn default_first_mover() -> Side {
    Side::White
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            first_mover: default_first_mover(),
            layout: LayoutKind::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Creates a configuration.
    pub fn new(first_mover: Side, layout: LayoutKind, seed: Option<u64>) -> Self {
        Self {
            first_mover,
            layout,
            seed,
        }
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(first_mover = %config.first_mover, layout = %config.layout, "Config loaded");
        Ok(config)
    }

    /// Builds the configured layout.
    pub fn builder(&self) -> BoardBuilder {
        match (self.layout, self.seed) {
            (LayoutKind::Demo, _) => BoardBuilder::demo(),
            (LayoutKind::Random, Some(seed)) => {
                BoardBuilder::random(&mut StdRng::seed_from_u64(seed))
            }
            (LayoutKind::Random, None) => BoardBuilder::random(&mut rand::rng()),
        }
    }

    /// Creates and starts a game with this configuration.
    #[instrument(skip(self), fields(layout = %self.layout, seed = ?self.seed))]
    pub fn new_game(&self) -> Result<Game, GameError> {
        let mut game = Game::new();
        game.build(&self.builder())?;
        game.start(self.first_mover)?;
        Ok(game)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
