use crate::game::{Board, Entity, Position, Simulation, SnakeId};

/// One-hot channels encoded for every cell
pub const CHANNELS: usize = 5;

const OWN_HEAD: usize = 0;
const OWN_BODY: usize = 1;
const ENEMY_HEAD: usize = 2;
const ENEMY_BODY: usize = 3;
const FOOD: usize = 4;

/// Length of the controller input vector for `board`
pub fn input_size(board: &Board) -> usize {
    2 + board.cell_count() * CHANNELS
}

/// Encode the simulation as seen by `snake`
///
/// Layout:
/// - `[0]`: current health
/// - `[1]`: current length
/// - then, for every cell row by row from `y = 0`, five one-hot channels:
///   own head, own body, enemy head, enemy body, food
///
/// Only the top entity of a cell is encoded. Dead snakes still encode as
/// heads and bodies; cells topped by a potential-move marker encode as all
/// zeros.
pub fn create_observation(sim: &Simulation, snake: SnakeId) -> Vec<f64> {
    let board = sim.board();
    let me = sim.snake(snake);

    let mut input = Vec::with_capacity(input_size(board));
    input.push(me.health() as f64);
    input.push(me.len() as f64);

    for pos in board.positions() {
        let mut cell = [0.0; CHANNELS];
        if let Some(channel) = channel_for(sim, snake, pos) {
            cell[channel] = 1.0;
        }
        input.extend_from_slice(&cell);
    }

    input
}

fn channel_for(sim: &Simulation, snake: SnakeId, pos: Position) -> Option<usize> {
    match sim.entities().top(pos)? {
        Entity::Head(owner) => Some(if owner == snake { OWN_HEAD } else { ENEMY_HEAD }),
        Entity::Body(owner) => Some(if owner == snake { OWN_BODY } else { ENEMY_BODY }),
        Entity::Food => Some(FOOD),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig};

    fn cell<'a>(input: &'a [f64], board: &Board, pos: Position) -> &'a [f64] {
        let index = 2 + (pos.y as usize * board.width + pos.x as usize) * CHANNELS;
        &input[index..index + CHANNELS]
    }

    #[test]
    fn test_observation_length() {
        let sim = Simulation::seeded(GameConfig::standard(), 1);
        let input = create_observation(&sim, SnakeId(0));
        assert_eq!(input.len(), 2 + 11 * 11 * 5);
        assert_eq!(input.len(), input_size(sim.board()));
    }

    #[test]
    fn test_scalar_features() {
        let sim = Simulation::seeded(GameConfig::standard(), 1);
        let input = create_observation(&sim, SnakeId(2));
        assert_eq!(input[0], 100.0);
        assert_eq!(input[1], 3.0);
    }

    #[test]
    fn test_own_and_enemy_channels() {
        let config = GameConfig::standard().with_snakes(2);
        let mut sim = Simulation::with_heads(config, &[Position::new(1, 1), Position::new(8, 8)], 2);
        sim.place_food(Position::new(5, 5));
        sim.step(|snake, _| {
            if snake.id() == SnakeId(0) {
                Direction::Right
            } else {
                Direction::Left
            }
        });

        let board = *sim.board();
        let input = create_observation(&sim, SnakeId(0));

        assert_eq!(cell(&input, &board, Position::new(2, 1)), &[1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(cell(&input, &board, Position::new(1, 1)), &[0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(cell(&input, &board, Position::new(7, 8)), &[0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(cell(&input, &board, Position::new(8, 8)), &[0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(cell(&input, &board, Position::new(5, 5)), &[0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_dead_snake_still_encodes() {
        let config = GameConfig::standard().with_snakes(2);
        let mut sim = Simulation::with_heads(config, &[Position::new(5, 5), Position::new(0, 0)], 3);
        sim.step(|snake, _| {
            if snake.id() == SnakeId(0) {
                Direction::Up
            } else {
                Direction::Left
            }
        });
        assert!(!sim.snake(SnakeId(1)).is_alive());

        let board = *sim.board();
        let corpse = Position::new(0, 0);
        assert_eq!(sim.entities().top(corpse), Some(Entity::Body(SnakeId(1))));

        let input = create_observation(&sim, SnakeId(0));
        assert_eq!(cell(&input, &board, corpse), &[0.0, 0.0, 0.0, 1.0, 0.0]);
        let own = create_observation(&sim, SnakeId(1));
        assert_eq!(cell(&own, &board, corpse), &[0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_every_cell_is_one_hot_or_empty() {
        let mut sim = Simulation::seeded(GameConfig::standard(), 8);
        for _ in 0..5 {
            sim.step(|_, sim| Direction::ALL[sim.turn() as usize % 4]);
        }

        let input = create_observation(&sim, SnakeId(0));
        for chunk in input[2..].chunks(CHANNELS) {
            let total: f64 = chunk.iter().sum();
            assert!(total == 0.0 || total == 1.0);
        }
    }
}
