//! Genetic-algorithm training of snake controllers
//!
//! - `config`: training parameters and validation
//! - `population`: fitness bookkeeping, elitism, roulette selection, breeding
//! - `tournament`: one game between a group of four controllers
//! - `trainer`: the parallel generation loop

pub mod config;
pub mod population;
pub mod tournament;
pub mod trainer;

pub use config::{ConfigError, GameEnd, TrainConfig, TOURNAMENT_SIZE};
pub use population::{Generation, Individual};
pub use tournament::{play_game, GameOutcome};
pub use trainer::Trainer;
