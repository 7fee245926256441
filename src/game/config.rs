use serde::{Deserialize, Serialize};

use super::state::Board;

/// Configuration for one simulated game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Number of snakes spawned into each game
    pub snake_count: usize,
    /// Initial length of every snake (all segments stacked on the spawn cell)
    pub initial_snake_length: usize,
    /// Health a snake is born with and restored to after eating
    pub max_health: i32,
    /// Chance of spawning another food item when food is already present
    pub food_spawn_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 11,
            grid_height: 11,
            snake_count: 4,
            initial_snake_length: 3,
            max_health: 100,
            food_spawn_chance: 0.15,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// The standard 11x11 board
    pub fn standard() -> Self {
        Self::default()
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(7, 7)
    }

    /// Set the number of snakes per game
    pub fn with_snakes(mut self, snake_count: usize) -> Self {
        self.snake_count = snake_count;
        self
    }

    pub fn board(&self) -> Board {
        Board::new(self.grid_width, self.grid_height)
    }
}
