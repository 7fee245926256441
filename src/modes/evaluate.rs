//! Evaluation mode for watching a trained controller play
//!
//! Loads a weights file and plays games on fresh boards with snake 0 driven
//! by the trained controller's top-scored legal move. An optional opponent
//! picks uniformly among its legal moves. With `verbose`, every turn prints
//! the controller's scores and the board.
//!
//! # Example
//!
//! ```rust,ignore
//! use neuro_snake::modes::{EvaluateConfig, EvaluateMode};
//! use std::path::PathBuf;
//!
//! let config = EvaluateConfig::new(PathBuf::from("models/best.dat"));
//! let mut mode = EvaluateMode::new(config)?;
//! let report = mode.run();
//! ```

use anyhow::{bail, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Duration;

use crate::brain::{load_variables, ok_moves, Brain, Variables};
use crate::evolution::GameEnd;
use crate::game::{Direction, GameConfig, Simulation, SnakeId};
use crate::render::render_board;

const TRAINED: SnakeId = SnakeId(0);

/// Configuration for evaluation mode
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    /// Weights file to load
    pub weights: PathBuf,

    /// Number of games to play
    pub games: usize,

    /// Add a snake that moves randomly among its legal moves
    pub opponent: bool,

    /// Print scores and the board every turn
    pub verbose: bool,

    /// Pause between turns when verbose
    pub delay: Duration,

    /// Seed for reproducible games
    pub seed: Option<u64>,

    /// Board settings; the snake count is set from `opponent`
    pub game_config: GameConfig,
}

impl EvaluateConfig {
    pub fn new(weights: PathBuf) -> Self {
        Self {
            weights,
            games: 1,
            opponent: false,
            verbose: false,
            delay: Duration::from_millis(100),
            seed: None,
            game_config: GameConfig::default(),
        }
    }
}

/// Result of one evaluation game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationGame {
    /// Turns played
    pub turns: u32,

    /// Steps the trained snake survived
    pub trained_steps: u32,

    /// Surviving snake when the opponent was beaten or won
    pub winner: Option<SnakeId>,
}

/// Evaluation mode for trained controllers
pub struct EvaluateMode {
    variables: Variables,
    config: EvaluateConfig,
    rng: StdRng,
}

impl EvaluateMode {
    /// Load the weights file; fails if it is missing, corrupt, or built for
    /// a different board size.
    pub fn new(config: EvaluateConfig) -> Result<Self> {
        if config.game_config.grid_width == 0 || config.game_config.grid_height == 0 {
            bail!("Grid dimensions must be positive");
        }
        let variables = load_variables(&config.weights)?;
        let board = config.game_config.board();
        if !variables.fits(&board) {
            bail!(
                "Controller in {:?} was not trained for a {}x{} board",
                config.weights,
                board.width,
                board.height
            );
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            variables,
            config,
            rng,
        })
    }

    /// Play every configured game and print a one-line result for each
    pub fn run(&mut self) -> Vec<EvaluationGame> {
        let mut results = Vec::with_capacity(self.config.games);

        for game in 0..self.config.games {
            let result = self.play_game();
            println!("Game {}: {}", game + 1, describe(&result, self.config.opponent));
            results.push(result);
        }

        if results.len() > 1 {
            let mean = results.iter().map(|r| r.trained_steps as f64).sum::<f64>()
                / results.len() as f64;
            println!("Mean steps survived: {:.1}", mean);
        }

        results
    }

    /// Play one game to its end
    pub fn play_game(&mut self) -> EvaluationGame {
        let (snakes, end) = if self.config.opponent {
            (2, GameEnd::LastSurvivor)
        } else {
            (1, GameEnd::Extinction)
        };
        let config = self.config.game_config.clone().with_snakes(snakes);
        let mut sim = Simulation::seeded(config, self.rng.gen());

        let variables = &self.variables;
        let verbose = self.config.verbose;
        let rng = &mut self.rng;

        while !end.is_over(sim.remaining()) {
            sim.step(|snake, sim| {
                if snake.id() != TRAINED {
                    let legal = ok_moves(snake, sim);
                    return match legal.choose(&mut *rng) {
                        Some(&direction) => direction,
                        None => Direction::random(&mut *rng),
                    };
                }

                let brain = Brain::new(variables, snake.id(), sim);
                if verbose {
                    let scores: Vec<String> = brain
                        .scored_moves()
                        .iter()
                        .map(|m| format!("{:?}: {:.3}", m.direction, m.score))
                        .collect();
                    println!("{:?} {}", snake.body(), scores.join(", "));
                }
                brain.best_move(&mut *rng)
            });

            if verbose {
                println!("{}", render_board(&sim));
                std::thread::sleep(self.config.delay);
            }
        }

        let winner = match sim.remaining() {
            1 => sim.alive().next().map(|s| s.id()),
            _ => None,
        };
        let trained = sim.snake(TRAINED);
        debug!(
            "Evaluation game over after {} turns: trained snake {:?}",
            sim.turn(),
            trained.death()
        );

        EvaluationGame {
            turns: sim.turn(),
            trained_steps: trained.steps_survived(),
            winner,
        }
    }
}

fn describe(result: &EvaluationGame, opponent: bool) -> String {
    let outcome = match (opponent, result.winner) {
        (false, _) => String::new(),
        (true, Some(TRAINED)) => ", the trained snake won".to_string(),
        (true, Some(_)) => ", the random snake won".to_string(),
        (true, None) => ", no winner".to_string(),
    };
    format!(
        "length {} turns, trained snake survived {} steps{}",
        result.turns, result.trained_steps, outcome
    )
}
