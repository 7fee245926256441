//! Generation loop
//!
//! Every generation the population is dealt into disjoint groups of
//! [`TOURNAMENT_SIZE`] and each group plays one game per round. Games run on
//! a dedicated rayon pool; each task owns its group's slice of the
//! population outright, so fitness accumulators are never shared between
//! workers. The loop waits for every game before ranking, reporting and
//! breeding the next generation.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPool;

use super::config::{TrainConfig, TOURNAMENT_SIZE};
use super::population::{next_population, random_population, seeded_population, Generation};
use super::tournament::{play_game, GameOutcome};
use crate::brain::{load_variables, save_variables, ModelMetadata};
use crate::metrics::{FitnessSummary, GenerationStats};

/// Genetic-algorithm trainer
pub struct Trainer {
    config: TrainConfig,
    pool: ThreadPool,
    rng: StdRng,
    stats: GenerationStats,
}

impl Trainer {
    /// Create a trainer, failing fast on an invalid configuration
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("tournament-{i}"))
            .build()
            .context("Failed to build worker pool")?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            pool,
            rng,
            stats: GenerationStats::new(10),
        })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Run every configured generation and return the last one, ranked
    pub fn run(&mut self) -> Result<Generation> {
        let mut generation = self.initial_generation();

        loop {
            self.evaluate(&mut generation);
            generation.sort_by_fitness();
            self.report(&generation)?;

            if generation.number + 1 >= self.config.generations {
                return Ok(generation);
            }
            generation = self.next_generation(generation);
        }
    }

    /// First population: seeded from the weights file at the output path
    /// when it holds a usable controller, random otherwise.
    pub fn initial_generation(&mut self) -> Generation {
        let path = &self.config.output;
        let board = self.config.game_config.board();

        let individuals = if !path.exists() {
            info!("No saved controller at {:?}, starting from random", path);
            random_population(self.config.population, &board, &mut self.rng)
        } else {
            match load_variables(path) {
                Ok(seed) if seed.fits(&board) => {
                    info!("Seeding population from {:?}", path);
                    seeded_population(&seed, &self.config, &mut self.rng)
                }
                Ok(_) => {
                    warn!(
                        "Controller in {:?} does not fit a {}x{} board, starting from random",
                        path, board.width, board.height
                    );
                    random_population(self.config.population, &board, &mut self.rng)
                }
                Err(err) => {
                    warn!("{:#}, starting from random", err);
                    random_population(self.config.population, &board, &mut self.rng)
                }
            }
        };

        Generation {
            number: 0,
            individuals,
        }
    }

    /// Play every round of games for `generation`, accumulating fitness
    pub fn evaluate(&mut self, generation: &mut Generation) -> Vec<GameOutcome> {
        let games = generation.individuals.len() / TOURNAMENT_SIZE;
        let mut outcomes = Vec::with_capacity(games * self.config.rounds);

        for round in 0..self.config.rounds {
            if round > 0 {
                generation.individuals.shuffle(&mut self.rng);
            }
            let seeds: Vec<u64> = (0..games).map(|_| self.rng.gen()).collect();

            let config = &self.config;
            let individuals = &mut generation.individuals;
            let round_outcomes: Vec<GameOutcome> = self.pool.install(|| {
                individuals
                    .par_chunks_mut(TOURNAMENT_SIZE)
                    .zip(seeds.par_iter())
                    .map(|(group, &seed)| play_game(group, config, seed))
                    .collect()
            });

            debug!(
                "generation {} round {}: {} games, longest {} turns",
                generation.number,
                round,
                round_outcomes.len(),
                round_outcomes.iter().map(|o| o.turns).max().unwrap_or(0)
            );
            outcomes.extend(round_outcomes);
        }

        if self.config.snapshot {
            for snapshot in outcomes.iter().filter_map(|o| o.snapshot.as_deref()) {
                info!("Final board:\n{}", snapshot);
            }
        }

        outcomes
    }

    /// Breed the next generation from a ranked one
    pub fn next_generation(&mut self, previous: Generation) -> Generation {
        Generation {
            number: previous.number + 1,
            individuals: next_population(&previous.individuals, &self.config, &mut self.rng),
        }
    }

    /// Record statistics and save the best controller
    fn report(&mut self, generation: &Generation) -> Result<()> {
        let summary = FitnessSummary::from_sorted(&generation.fitness());
        let games = generation.individuals.len() / TOURNAMENT_SIZE * self.config.rounds;
        self.stats.record_generation(summary, games);

        info!(
            "Generation {}: best {:.2}, avg {:.2}, median {:.2}",
            generation.number, summary.best, summary.average, summary.median
        );
        debug!("{}", self.stats.format_summary());

        if let Some(best) = generation.individuals.first() {
            let board = self.config.game_config.board();
            let metadata = ModelMetadata::new(
                board.width,
                board.height,
                generation.number,
                best.normalized_fitness(),
            )
            .with_training(self.config.clone());
            save_variables(&best.variables, &metadata, &self.config.output)?;
        }

        Ok(())
    }
}
