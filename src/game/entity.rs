//! Per-cell entity stacks and simultaneous-move collision resolution
//!
//! Every turn the simulation throws the previous map away and rebuilds it
//! from the snake table and the food set. Stacks are ordered top first:
//!
//! - a living head always goes on top
//! - a living body segment goes directly under any living heads
//! - entities of dead snakes sink to the bottom in insertion order
//!
//! Collisions are resolved while inserting, against whatever was on top of
//! the cell before the new entity arrived.

use std::collections::{HashMap, HashSet};

use super::action::Direction;
use super::state::{Board, DeathCause, Position, Snake, SnakeId};

/// Occupant of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Head(SnakeId),
    Body(SnakeId),
    /// Cell a living snake could reach next turn
    PotentialMove(SnakeId),
    Food,
}

impl Entity {
    /// The snake this entity refers to, if any
    pub fn snake(&self) -> Option<SnakeId> {
        match *self {
            Entity::Head(id) | Entity::Body(id) | Entity::PotentialMove(id) => Some(id),
            Entity::Food => None,
        }
    }

    /// True for head and body segments of `id`
    fn is_segment_of(&self, id: SnakeId) -> bool {
        matches!(*self, Entity::Head(s) | Entity::Body(s) if s == id)
    }
}

/// Map from position to the stack of entities occupying it, top first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMap {
    cells: HashMap<Position, Vec<Entity>>,
}

impl EntityMap {
    /// The whole stack at `pos`, top first; empty if nothing is there
    pub fn stack(&self, pos: Position) -> &[Entity] {
        self.cells.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The topmost entity at `pos`
    pub fn top(&self, pos: Position) -> Option<Entity> {
        self.stack(pos).first().copied()
    }

    /// True if any entity, including potential-move markers, tracks `pos`
    pub fn is_occupied(&self, pos: Position) -> bool {
        !self.stack(pos).is_empty()
    }

    /// Rebuild the map from scratch.
    ///
    /// With `apply_collisions` set, snakes that lose a collision are marked
    /// dead on the spot and returned in the order they died.
    pub(crate) fn rebuild(
        snakes: &mut [Snake],
        food: &HashSet<Position>,
        board: &Board,
        apply_collisions: bool,
    ) -> (Self, Vec<SnakeId>) {
        let mut map = EntityMap::default();
        let mut deaths = Vec::new();

        for &pos in food {
            map.cells.insert(pos, vec![Entity::Food]);
        }

        // Living snakes first; stable sort keeps table order within each group
        let mut order: Vec<usize> = (0..snakes.len()).collect();
        order.sort_by_key(|&i| !snakes[i].is_alive());

        for index in order {
            let id = SnakeId(index);
            for segment in 0..snakes[index].body.len() {
                let pos = snakes[index].body[segment];
                let entity = if segment == 0 {
                    Entity::Head(id)
                } else {
                    Entity::Body(id)
                };
                let alive = snakes[index].is_alive();

                let previous_top = match map.cells.get_mut(&pos) {
                    Some(stack) if !stack.is_empty() => {
                        let previous_top = stack[0];
                        if !alive {
                            stack.push(entity);
                        } else if let Entity::Head(_) = entity {
                            stack.insert(0, entity);
                        } else {
                            let below_heads = stack
                                .iter()
                                .take_while(|e| matches!(e, Entity::Head(s) if snakes[s.0].is_alive()))
                                .count();
                            stack.insert(below_heads, entity);
                        }
                        previous_top
                    }
                    _ => {
                        map.cells.insert(pos, vec![entity]);
                        continue;
                    }
                };

                if apply_collisions && alive {
                    if let Some((victim, cause)) = resolve_collision(snakes, entity, previous_top) {
                        kill(snakes, victim, cause);
                        map.sink(&snakes[victim.0]);
                        deaths.push(victim);
                    }
                }
            }
        }

        for snake in snakes.iter().filter(|s| s.is_alive()) {
            for direction in Direction::ALL {
                let pos = direction.apply(snake.head());
                if board.contains(pos) {
                    map.cells
                        .entry(pos)
                        .or_default()
                        .push(Entity::PotentialMove(snake.id()));
                }
            }
        }

        (map, deaths)
    }

    /// Move every already-placed segment of `snake` to the bottom of its
    /// cell, keeping the snake's own top-to-bottom order.
    fn sink(&mut self, snake: &Snake) {
        let mut visited = HashSet::new();
        for &pos in snake.body() {
            if !visited.insert(pos) {
                continue;
            }
            if let Some(stack) = self.cells.get_mut(&pos) {
                let (own, others): (Vec<Entity>, Vec<Entity>) =
                    stack.drain(..).partition(|e| e.is_segment_of(snake.id()));
                stack.extend(others);
                stack.extend(own);
            }
        }
    }
}

/// Decide who dies when `incoming` lands on a cell topped by `resident`.
///
/// Both snakes must be alive for anything to happen. Head-to-head goes to
/// the longer snake; on a tie the incoming snake survives.
// NOTE: the tie winner is decided by processing order, not by any game rule.
fn resolve_collision(
    snakes: &[Snake],
    incoming: Entity,
    resident: Entity,
) -> Option<(SnakeId, DeathCause)> {
    let (a, b) = (incoming.snake()?, resident.snake()?);
    if !snakes[a.0].is_alive() || !snakes[b.0].is_alive() {
        return None;
    }

    match (incoming, resident) {
        (Entity::Head(a), Entity::Head(b)) => {
            if snakes[a.0].len() >= snakes[b.0].len() {
                Some((b, DeathCause::CollidedWithEnemy(a)))
            } else {
                Some((a, DeathCause::CollidedWithEnemy(b)))
            }
        }
        (Entity::Head(head), Entity::Body(body)) | (Entity::Body(body), Entity::Head(head)) => {
            let cause = if head == body {
                DeathCause::CollidedWithSelf
            } else {
                DeathCause::CollidedWithEnemy(body)
            };
            Some((head, cause))
        }
        _ => None,
    }
}

/// Mark a snake dead and credit the killer, if any
pub(crate) fn kill(snakes: &mut [Snake], victim: SnakeId, cause: DeathCause) {
    let snake = &mut snakes[victim.0];
    if !snake.is_alive() {
        return;
    }
    snake.death = Some(cause);
    if let DeathCause::CollidedWithEnemy(killer) = cause {
        snakes[killer.0].kills += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_with_body(id: usize, body: &[(i32, i32)]) -> Snake {
        let mut snake = Snake::new(SnakeId(id), Position::new(body[0].0, body[0].1), 1, 100);
        snake.body = body.iter().map(|&(x, y)| Position::new(x, y)).collect();
        snake
    }

    #[test]
    fn test_spawned_snake_stacks_head_over_body() {
        let mut snakes = vec![Snake::new(SnakeId(0), Position::new(3, 3), 3, 100)];
        let (map, deaths) =
            EntityMap::rebuild(&mut snakes, &HashSet::new(), &Board::new(7, 7), false);

        assert!(deaths.is_empty());
        assert_eq!(
            map.stack(Position::new(3, 3)),
            &[
                Entity::Head(SnakeId(0)),
                Entity::Body(SnakeId(0)),
                Entity::Body(SnakeId(0))
            ]
        );
    }

    #[test]
    fn test_potential_moves_stay_on_board() {
        let mut snakes = vec![Snake::new(SnakeId(0), Position::new(0, 0), 3, 100)];
        let (map, _) = EntityMap::rebuild(&mut snakes, &HashSet::new(), &Board::new(5, 5), false);

        assert_eq!(map.top(Position::new(1, 0)), Some(Entity::PotentialMove(SnakeId(0))));
        assert_eq!(map.top(Position::new(0, 1)), Some(Entity::PotentialMove(SnakeId(0))));
        assert!(!map.is_occupied(Position::new(-1, 0)));
        assert!(!map.is_occupied(Position::new(0, -1)));
    }

    #[test]
    fn test_food_sits_under_snake() {
        let mut snakes = vec![snake_with_body(0, &[(2, 2), (2, 1), (2, 0)])];
        let food: HashSet<_> = [Position::new(2, 1)].into_iter().collect();
        let (map, deaths) = EntityMap::rebuild(&mut snakes, &food, &Board::new(5, 5), true);

        assert!(deaths.is_empty());
        assert_eq!(
            map.stack(Position::new(2, 1)),
            &[
                Entity::Body(SnakeId(0)),
                Entity::Food,
                Entity::PotentialMove(SnakeId(0))
            ]
        );
    }

    #[test]
    fn test_longer_snake_wins_head_on() {
        let mut snakes = vec![
            snake_with_body(0, &[(2, 2), (1, 2), (0, 2)]),
            snake_with_body(1, &[(2, 2), (3, 2), (4, 2), (4, 3), (4, 4)]),
        ];
        let (map, deaths) =
            EntityMap::rebuild(&mut snakes, &HashSet::new(), &Board::new(5, 5), true);

        assert_eq!(deaths, vec![SnakeId(0)]);
        assert_eq!(snakes[0].death(), Some(DeathCause::CollidedWithEnemy(SnakeId(1))));
        assert!(snakes[1].is_alive());
        assert_eq!(snakes[1].kills(), 1);
        assert_eq!(map.top(Position::new(2, 2)), Some(Entity::Head(SnakeId(1))));
    }

    #[test]
    fn test_head_on_tie_kills_exactly_one() {
        let mut snakes = vec![
            snake_with_body(0, &[(2, 2), (1, 2), (0, 2)]),
            snake_with_body(1, &[(2, 2), (3, 2), (4, 2)]),
        ];
        let (_, deaths) = EntityMap::rebuild(&mut snakes, &HashSet::new(), &Board::new(5, 5), true);

        assert_eq!(deaths.len(), 1);
        let alive = snakes.iter().filter(|s| s.is_alive()).count();
        assert_eq!(alive, 1);
        // The snake processed second lands on top of the first and wins the tie
        assert!(snakes[1].is_alive());
    }

    #[test]
    fn test_head_into_enemy_body() {
        let mut snakes = vec![
            snake_with_body(0, &[(2, 3), (2, 2), (2, 1)]),
            snake_with_body(1, &[(2, 2), (3, 2), (4, 2)]),
        ];
        let (map, deaths) =
            EntityMap::rebuild(&mut snakes, &HashSet::new(), &Board::new(5, 5), true);

        assert_eq!(deaths, vec![SnakeId(1)]);
        assert_eq!(snakes[1].death(), Some(DeathCause::CollidedWithEnemy(SnakeId(0))));
        // The dead head sank below the living body segment; the cell is
        // also next to snake 0's head
        assert_eq!(
            map.stack(Position::new(2, 2)),
            &[
                Entity::Body(SnakeId(0)),
                Entity::Head(SnakeId(1)),
                Entity::PotentialMove(SnakeId(0))
            ]
        );
    }

    #[test]
    fn test_head_into_own_body() {
        let mut snakes = vec![snake_with_body(0, &[(2, 2), (2, 3), (3, 3), (3, 2), (2, 2)])];
        let (_, deaths) = EntityMap::rebuild(&mut snakes, &HashSet::new(), &Board::new(5, 5), true);

        assert_eq!(deaths, vec![SnakeId(0)]);
        assert_eq!(snakes[0].death(), Some(DeathCause::CollidedWithSelf));
    }

    #[test]
    fn test_dead_snake_does_not_block() {
        let mut snakes = vec![
            snake_with_body(0, &[(2, 2), (1, 2), (0, 2)]),
            snake_with_body(1, &[(4, 4), (3, 4), (2, 4)]),
        ];
        snakes[0].death = Some(DeathCause::RanOutOfHealth);
        snakes[1].body[0] = Position::new(1, 2);

        let (map, deaths) =
            EntityMap::rebuild(&mut snakes, &HashSet::new(), &Board::new(5, 5), true);

        assert!(deaths.is_empty());
        assert!(snakes[1].is_alive());
        assert_eq!(
            map.stack(Position::new(1, 2)),
            &[Entity::Head(SnakeId(1)), Entity::Body(SnakeId(0))]
        );
    }

    #[test]
    fn test_body_on_body_is_harmless() {
        let mut snakes = vec![
            snake_with_body(0, &[(1, 1), (2, 1), (3, 1)]),
            snake_with_body(1, &[(3, 3), (3, 2), (3, 1)]),
        ];
        let (_, deaths) = EntityMap::rebuild(&mut snakes, &HashSet::new(), &Board::new(5, 5), true);

        assert!(deaths.is_empty());
        assert!(snakes.iter().all(|s| s.is_alive()));
    }
}
