//! Training configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::game::GameConfig;

/// Controllers per simulated game
pub const TOURNAMENT_SIZE: usize = 4;

/// Errors raised by [`TrainConfig::validate`]
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("population size {population} is not a multiple of the tournament size {tournament}")]
    PopulationNotDivisible { population: usize, tournament: usize },

    #[error("{field} must be positive")]
    Zero { field: &'static str },

    #[error("{field} must be in [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("elite and fresh fractions add up to {0}, which exceeds 1")]
    FractionsTooLarge(f64),

    #[error("games need {tournament} snakes, got {snakes}")]
    SnakeCount { snakes: usize, tournament: usize },
}

/// When a tournament game stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEnd {
    /// Stop once at most one snake is alive
    #[default]
    LastSurvivor,

    /// Play on until every snake has died
    Extinction,
}

impl GameEnd {
    /// True if a game with `remaining` living snakes is over
    pub fn is_over(self, remaining: usize) -> bool {
        match self {
            GameEnd::LastSurvivor => remaining <= 1,
            GameEnd::Extinction => remaining == 0,
        }
    }
}

/// Configuration for the genetic-algorithm trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Number of generations to run
    pub generations: usize,

    /// Controllers per generation; must be a multiple of [`TOURNAMENT_SIZE`]
    pub population: usize,

    /// Where the best controller is written after every generation
    ///
    /// If the file already exists when training starts, the first
    /// generation is seeded from it.
    pub output: PathBuf,

    /// Games each controller plays per generation
    ///
    /// Default: 1
    pub rounds: usize,

    /// Worker threads evaluating games
    ///
    /// Default: 4
    pub workers: usize,

    /// Per-entry redraw probability used by mutation and crossover
    ///
    /// Default: 0.01
    pub mutation_probability: f64,

    /// Share of the population carried over unchanged
    ///
    /// Default: 0.1
    pub elite_fraction: f64,

    /// Share of the population replaced by fresh random controllers
    ///
    /// Default: 0.1
    pub fresh_fraction: f64,

    /// When each game stops
    pub game_end: GameEnd,

    /// Seed for a reproducible run
    pub seed: Option<u64>,

    /// Print every game's board after it finishes
    pub snapshot: bool,

    /// Board and snake settings for every game
    pub game_config: GameConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            population: 100,
            output: PathBuf::from("models/best.dat"),
            rounds: 1,
            workers: 4,
            mutation_probability: 0.01,
            elite_fraction: 0.1,
            fresh_fraction: 0.1,
            game_end: GameEnd::default(),
            seed: None,
            snapshot: false,
            game_config: GameConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Create a training configuration with defaults
    pub fn new(generations: usize, population: usize, output: PathBuf) -> Self {
        Self {
            generations,
            population,
            output,
            ..Default::default()
        }
    }

    /// Check the configuration before any game is simulated
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("generations", self.generations),
            ("population", self.population),
            ("rounds", self.rounds),
            ("workers", self.workers),
            ("grid_width", self.game_config.grid_width),
            ("grid_height", self.game_config.grid_height),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }

        if self.population % TOURNAMENT_SIZE != 0 {
            return Err(ConfigError::PopulationNotDivisible {
                population: self.population,
                tournament: TOURNAMENT_SIZE,
            });
        }

        if self.game_config.snake_count != TOURNAMENT_SIZE {
            return Err(ConfigError::SnakeCount {
                snakes: self.game_config.snake_count,
                tournament: TOURNAMENT_SIZE,
            });
        }

        for (field, value) in [
            ("mutation_probability", self.mutation_probability),
            ("elite_fraction", self.elite_fraction),
            ("fresh_fraction", self.fresh_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let fractions = self.elite_fraction + self.fresh_fraction;
        if fractions > 1.0 {
            return Err(ConfigError::FractionsTooLarge(fractions));
        }

        Ok(())
    }
}
