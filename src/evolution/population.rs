//! Population construction and selection

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::TrainConfig;
use crate::brain::Variables;
use crate::game::Board;

/// One controller and its fitness accumulator for the current generation
#[derive(Debug, Clone)]
pub struct Individual {
    pub variables: Variables,

    /// Sum of steps survived over every game played this generation
    pub fitness: f64,

    pub games_played: u32,
}

impl Individual {
    pub fn new(variables: Variables) -> Self {
        Self {
            variables,
            fitness: 0.0,
            games_played: 0,
        }
    }

    /// Fitness averaged over games played, 0.0 before any game
    pub fn normalized_fitness(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.fitness / self.games_played as f64
        }
    }

    /// Add one game's result
    pub fn record_game(&mut self, steps_survived: u32) {
        self.fitness += steps_survived as f64;
        self.games_played += 1;
    }
}

/// A numbered population, handed from one generation to the next
#[derive(Debug, Clone)]
pub struct Generation {
    pub number: usize,
    pub individuals: Vec<Individual>,
}

impl Generation {
    /// Order by normalized fitness, best first
    pub fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by(|a, b| b.normalized_fitness().total_cmp(&a.normalized_fitness()));
    }

    /// Normalized fitness of every individual in current order
    pub fn fitness(&self) -> Vec<f64> {
        self.individuals
            .iter()
            .map(Individual::normalized_fitness)
            .collect()
    }
}

/// How a population of `size` splits into carried-over, bred and fresh
/// controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub kept: usize,
    pub bred: usize,
    pub fresh: usize,
}

impl Split {
    pub fn new(size: usize, kept_fraction: f64, fresh_fraction: f64) -> Self {
        let kept = ((size as f64 * kept_fraction).floor() as usize).min(size);
        let fresh = ((size as f64 * fresh_fraction).floor() as usize).min(size - kept);
        Self {
            kept,
            bred: size - kept - fresh,
            fresh,
        }
    }

    fn for_config(config: &TrainConfig) -> Self {
        Self::new(config.population, config.elite_fraction, config.fresh_fraction)
    }
}

/// Population of freshly randomized controllers
pub fn random_population<R: Rng + ?Sized>(
    size: usize,
    board: &Board,
    rng: &mut R,
) -> Vec<Individual> {
    (0..size)
        .map(|_| Individual::new(Variables::random(board, rng)))
        .collect()
}

/// First population derived from a saved controller: verbatim copies,
/// mutated copies, then fresh controllers, shuffled.
pub fn seeded_population<R: Rng + ?Sized>(
    seed: &Variables,
    config: &TrainConfig,
    rng: &mut R,
) -> Vec<Individual> {
    let split = Split::for_config(config);
    let board = config.game_config.board();
    let p = config.mutation_probability;

    let mut individuals = Vec::with_capacity(config.population);
    individuals.extend((0..split.kept).map(|_| Individual::new(seed.clone())));
    individuals.extend((0..split.bred).map(|_| Individual::new(seed.mutated(p, rng))));
    individuals.extend(random_population(split.fresh, &board, rng));

    individuals.shuffle(rng);
    individuals
}

/// Next population from an evaluated one: the fittest carried over,
/// roulette-selected offspring, then fresh controllers, shuffled.
///
/// Carried-over controllers start the new generation with a cleared
/// fitness accumulator.
pub fn next_population<R: Rng + ?Sized>(
    previous: &[Individual],
    config: &TrainConfig,
    rng: &mut R,
) -> Vec<Individual> {
    let split = Split::for_config(config);
    let board = config.game_config.board();
    let p = config.mutation_probability;

    let mut ranked: Vec<&Individual> = previous.iter().collect();
    ranked.sort_by(|a, b| b.normalized_fitness().total_cmp(&a.normalized_fitness()));

    let weights: Vec<f64> = previous.iter().map(Individual::normalized_fitness).collect();

    let mut individuals = Vec::with_capacity(config.population);
    individuals.extend(
        ranked
            .iter()
            .take(split.kept)
            .map(|ind| Individual::new(ind.variables.clone())),
    );
    if !previous.is_empty() {
        for _ in 0..split.bred {
            let a = &previous[roulette(&weights, rng)].variables;
            let b = &previous[roulette(&weights, rng)].variables;
            individuals.push(Individual::new(a.offspring(b, p, rng)));
        }
    }
    let missing = config.population - individuals.len();
    individuals.extend(random_population(missing, &board, rng));

    individuals.shuffle(rng);
    individuals
}

/// Fitness-proportional pick of an index into `weights`
///
/// Falls back to a uniform pick when no weight is positive.
///
/// # Panics
///
/// If `weights` is empty.
pub fn roulette<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return rng.gen_range(0..weights.len());
    }

    let mut target = rng.gen::<f64>() * total;
    for (index, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if target < w {
            return index;
        }
        target -= w;
    }

    // Float rounding can leave a sliver past the last positive weight
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}
