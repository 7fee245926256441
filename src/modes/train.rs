//! Training mode for evolving snake controllers
//!
//! Wraps the [`Trainer`] generation loop with a console header and a final
//! report. Progress per generation goes through the `log` facade.
//!
//! # Example
//!
//! ```rust,ignore
//! use neuro_snake::evolution::TrainConfig;
//! use neuro_snake::modes::TrainMode;
//! use std::path::PathBuf;
//!
//! let config = TrainConfig::new(50, 100, PathBuf::from("models/best.dat"));
//! let mut train_mode = TrainMode::new(config)?;
//! train_mode.run()?;
//! ```

use anyhow::Result;

use crate::evolution::{TrainConfig, Trainer};

/// Training mode for the genetic algorithm
pub struct TrainMode {
    trainer: Trainer,
}

impl TrainMode {
    /// Create a training mode, validating the configuration
    pub fn new(config: TrainConfig) -> Result<Self> {
        Ok(Self {
            trainer: Trainer::new(config)?,
        })
    }

    /// Run every generation, then print the final statistics
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        let last = self.trainer.run()?;

        println!("\nTraining complete!");
        println!("Best controller saved to: {:?}", self.trainer.config().output);
        if let Some(best) = last.individuals.first() {
            println!(
                "Final generation best: {:.2} steps over {} game(s)",
                best.normalized_fitness(),
                best.games_played
            );
        }
        println!("\nFinal Statistics:");
        println!("{}", self.trainer.stats().format_summary());

        Ok(())
    }

    fn print_header(&self) {
        let config = self.trainer.config();
        println!("{}", "=".repeat(70));
        println!("Genetic Training - Neuro Snake");
        println!("{}", "=".repeat(70));
        println!("Generations: {}", config.generations);
        println!("Population: {}", config.population);
        println!(
            "Game Config: {}x{} grid, {} snakes, game ends on {:?}",
            config.game_config.grid_width,
            config.game_config.grid_height,
            config.game_config.snake_count,
            config.game_end
        );
        println!("Breeding:");
        println!("  Mutation probability: {}", config.mutation_probability);
        println!("  Elite fraction: {}", config.elite_fraction);
        println!("  Fresh fraction: {}", config.fresh_fraction);
        println!("Rounds per generation: {}", config.rounds);
        println!("Workers: {}", config.workers);
        println!("Save path: {:?}", config.output);
        println!("{}", "=".repeat(70));
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_train_mode_creation() {
        let temp_dir = TempDir::new().unwrap();
        let config = TrainConfig::new(1, 8, temp_dir.path().join("best.dat"));
        assert!(TrainMode::new(config).is_ok());
    }

    #[test]
    fn test_train_mode_rejects_bad_population() {
        let config = TrainConfig::new(1, 6, PathBuf::from("unused.dat"));
        assert!(TrainMode::new(config).is_err());
    }

    #[test]
    fn test_run_writes_weights() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("models").join("best.dat");

        let mut config = TrainConfig::new(1, 4, save_path.clone());
        config.game_config = GameConfig::small();
        config.seed = Some(1);

        let mut train_mode = TrainMode::new(config).unwrap();
        train_mode.run().unwrap();
        assert!(save_path.exists());
    }
}
