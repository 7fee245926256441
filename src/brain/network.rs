//! Feed-forward controller bound to one snake in one simulation
//!
//! # Architecture
//!
//! ```text
//! Input: [1, 2 + W*H*5]   (health, length, 5 one-hot channels per cell)
//!   ↓ Linear(in → 16) + bias + ReLU
//!   ↓ Linear(16 → 16) + bias + ReLU
//!   ↓ Linear(16 → 4) + Sigmoid     (no bias on the output layer)
//! Output: one score per direction, in `Direction::ALL` order
//! ```

use rand::Rng;

use super::observation::create_observation;
use super::variables::Variables;
use crate::game::{Direction, Entity, Simulation, Snake, SnakeId};
use crate::tensor::Matrix;

/// A direction with the score the controller gave it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMove {
    pub direction: Direction,
    pub score: f64,
}

/// Controller parameters bound to a snake and the simulation it lives in
///
/// Holds no state of its own; scores are recomputed from the simulation on
/// every call.
pub struct Brain<'a> {
    variables: &'a Variables,
    snake: SnakeId,
    sim: &'a Simulation,
}

impl<'a> Brain<'a> {
    pub fn new(variables: &'a Variables, snake: SnakeId, sim: &'a Simulation) -> Self {
        debug_assert!(
            variables.fits(sim.board()),
            "controller topology does not match a {}x{} board",
            sim.board().width,
            sim.board().height
        );
        Self {
            variables,
            snake,
            sim,
        }
    }

    /// Score all four directions, unfiltered
    pub fn scored_moves(&self) -> Vec<ScoredMove> {
        let input = Matrix::row_vector(create_observation(self.sim, self.snake));
        let output = forward(self.variables, input);

        Direction::ALL
            .iter()
            .zip(output.row(0))
            .map(|(&direction, score)| ScoredMove { direction, score })
            .collect()
    }

    /// Pick a move for training: legal moves only, biased towards the top
    /// scores, random if nothing is legal.
    pub fn choose_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        let snake = self.sim.snake(self.snake);
        let sorted = filter_and_sort_moves(&self.scored_moves(), snake, self.sim);
        if sorted.is_empty() {
            return Direction::random(rng);
        }
        let u: f64 = rng.gen();
        let index = ((u * u) * sorted.len() as f64) as usize;
        sorted[index.min(sorted.len() - 1)].direction
    }

    /// Highest-scoring legal move, random if nothing is legal
    pub fn best_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        filter_and_sort_moves(&self.scored_moves(), self.sim.snake(self.snake), self.sim)
            .first()
            .map(|m| m.direction)
            .unwrap_or_else(|| Direction::random(rng))
    }
}

/// Run the network on a `1×n` input row
fn forward(variables: &Variables, input: Matrix) -> Matrix {
    let layers = variables.weights().len();
    let mut output = input;

    for (index, weights) in variables.weights().iter().enumerate() {
        output = &output * weights;
        if index == layers - 1 {
            output = output.map(sigmoid);
        } else {
            output = (&output + &variables.biases()[index]).map(relu);
        }
    }

    output
}

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Drop moves that leave the board or run into a living body or another
/// snake's living head, then sort the rest by descending score.
///
/// Moving onto one's own head cell is not filtered.
pub fn filter_and_sort_moves(
    moves: &[ScoredMove],
    snake: &Snake,
    sim: &Simulation,
) -> Vec<ScoredMove> {
    let mut kept: Vec<ScoredMove> = moves
        .iter()
        .copied()
        .filter(|m| is_open(m.direction, snake, sim))
        .collect();
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept
}

/// Every direction that passes the same test as [`filter_and_sort_moves`]
pub fn ok_moves(snake: &Snake, sim: &Simulation) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&d| is_open(d, snake, sim))
        .collect()
}

fn is_open(direction: Direction, snake: &Snake, sim: &Simulation) -> bool {
    let target = direction.apply(snake.head());
    if !sim.board().contains(target) {
        return false;
    }

    match sim.entities().top(target) {
        Some(Entity::Body(owner)) if sim.snake(owner).is_alive() => false,
        Some(Entity::Head(owner)) if sim.snake(owner).is_alive() && owner != snake.id() => false,
        _ => true,
    }
}
