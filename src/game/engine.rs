use std::collections::HashSet;

use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    action::Direction,
    config::GameConfig,
    entity::{kill, Entity, EntityMap},
    state::{Board, DeathCause, Position, Snake, SnakeId},
};

/// One multi-snake game, advanced a turn at a time
///
/// The simulation owns every snake; callers address them through
/// [`SnakeId`]. After each [`Simulation::step`] the snakes that died during
/// that turn are available from [`Simulation::died_this_turn`].
pub struct Simulation {
    config: GameConfig,
    board: Board,
    snakes: Vec<Snake>,
    food: HashSet<Position>,
    entities: EntityMap,
    remaining: usize,
    turn: u32,
    died_this_turn: Vec<SnakeId>,
    rng: StdRng,
}

impl Simulation {
    /// Create a game with `config.snake_count` snakes at random open cells,
    /// fully determined by `seed`
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = config.board();
        let mut taken = HashSet::new();
        let mut heads = Vec::with_capacity(config.snake_count);

        for _ in 0..config.snake_count {
            let open: Vec<Position> = board.positions().filter(|p| !taken.contains(p)).collect();
            // A board with fewer cells than snakes stacks the extras at random
            let head = open
                .choose(&mut rng)
                .copied()
                .unwrap_or_else(|| board.random_position(&mut rng));
            taken.insert(head);
            heads.push(head);
        }

        Self::build(config, heads, rng)
    }

    /// Create a game with snakes born at the given head positions
    pub fn with_heads(config: GameConfig, heads: &[Position], seed: u64) -> Self {
        Self::build(config, heads.to_vec(), StdRng::seed_from_u64(seed))
    }

    fn build(config: GameConfig, heads: Vec<Position>, rng: StdRng) -> Self {
        let board = config.board();
        let mut snakes: Vec<Snake> = heads
            .into_iter()
            .enumerate()
            .map(|(i, head)| {
                Snake::new(SnakeId(i), head, config.initial_snake_length, config.max_health)
            })
            .collect();
        let food = HashSet::new();
        let (entities, _) = EntityMap::rebuild(&mut snakes, &food, &board, false);
        let remaining = snakes.len();

        Self {
            config,
            board,
            snakes,
            food,
            entities,
            remaining,
            turn: 0,
            died_this_turn: Vec::new(),
            rng,
        }
    }

    /// Play one turn.
    ///
    /// `select_move` is asked once for every living snake, against the state
    /// at the start of the turn, before anything moves. Whatever it returns
    /// is applied as-is; suicidal moves are resolved by the normal rules.
    pub fn step<F>(&mut self, mut select_move: F) -> &[SnakeId]
    where
        F: FnMut(&Snake, &Simulation) -> Direction,
    {
        self.died_this_turn.clear();
        self.spawn_food();

        let moves: Vec<(usize, Direction)> = self
            .snakes
            .iter()
            .enumerate()
            .filter(|(_, snake)| snake.is_alive())
            .map(|(i, snake)| (i, select_move(snake, self)))
            .collect();

        for (index, direction) in moves {
            self.apply_move(SnakeId(index), direction);
        }

        let (entities, deaths) =
            EntityMap::rebuild(&mut self.snakes, &self.food, &self.board, true);
        self.entities = entities;
        for id in deaths {
            self.record_death(id);
        }

        self.turn += 1;
        &self.died_this_turn
    }

    /// Move one snake and resolve health, walls and food for it
    fn apply_move(&mut self, id: SnakeId, direction: Direction) {
        let max_health = self.config.max_health;
        let snake = &mut self.snakes[id.0];

        snake.advance(direction);
        snake.health -= 1;
        snake.steps_survived += 1;

        let cause = if snake.health <= 0 {
            Some(DeathCause::RanOutOfHealth)
        } else if !self.board.contains(snake.head()) {
            Some(DeathCause::CollidedWithWall)
        } else {
            if self.food.remove(&snake.head()) {
                snake.grow();
                snake.health = max_health;
            }
            None
        };

        if let Some(cause) = cause {
            kill(&mut self.snakes, id, cause);
            self.record_death(id);
        }
    }

    fn record_death(&mut self, id: SnakeId) {
        self.remaining -= 1;
        self.died_this_turn.push(id);
        trace!(
            "turn {}: {} died ({:?})",
            self.turn + 1,
            id,
            self.snakes[id.0].death()
        );
    }

    /// Drop a food item on a random untracked cell.
    ///
    /// Always tried when the board has no food; otherwise only with
    /// probability `food_spawn_chance`.
    fn spawn_food(&mut self) {
        if !self.food.is_empty() && self.rng.gen::<f64>() >= self.config.food_spawn_chance {
            return;
        }

        let open: Vec<Position> = self
            .board
            .positions()
            .filter(|&p| !self.entities.is_occupied(p))
            .collect();

        if let Some(&pos) = open.choose(&mut self.rng) {
            self.food.insert(pos);
        }
    }

    /// Place a food item directly, bypassing the spawn roll
    pub fn place_food(&mut self, pos: Position) {
        self.food.insert(pos);
        let (entities, _) = EntityMap::rebuild(&mut self.snakes, &self.food, &self.board, false);
        self.entities = entities;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, id: SnakeId) -> &Snake {
        &self.snakes[id.0]
    }

    pub fn food(&self) -> &HashSet<Position> {
        &self.food
    }

    pub fn entities(&self) -> &EntityMap {
        &self.entities
    }

    /// Entity stack at `pos`, top first
    pub fn entities_at(&self, pos: Position) -> &[Entity] {
        self.entities.stack(pos)
    }

    /// Number of snakes still alive
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Turns played so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Snakes that died during the most recent turn, in order of death
    pub fn died_this_turn(&self) -> &[SnakeId] {
        &self.died_this_turn
    }

    /// Snakes still alive, in table order
    pub fn alive(&self) -> impl Iterator<Item = &Snake> {
        self.snakes.iter().filter(|s| s.is_alive())
    }
}
