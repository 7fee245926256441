use rand::seq::SliceRandom;
use rand::Rng;

use super::state::Position;

/// Direction a snake can move
///
/// `Up` increases `y`; the board origin is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in the order the controller scores them
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Position reached by moving one cell from `position` in this direction
    pub fn apply(&self, position: Position) -> Position {
        let (dx, dy) = self.delta();
        position.moved_by(dx, dy)
    }

    /// Index of this direction within [`Direction::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Uniformly random direction, ignoring the board entirely
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Direction::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, 1));
        assert_eq!(Direction::Down.delta(), (0, -1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_apply() {
        let origin = Position::new(0, 0);
        assert_eq!(Direction::Up.apply(origin), Position::new(0, 1));
        assert_eq!(Direction::Down.apply(origin), Position::new(0, -1));
        assert_eq!(Direction::Left.apply(origin), Position::new(-1, 0));
        assert_eq!(Direction::Right.apply(origin), Position::new(1, 0));
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(direction.index(), i);
        }
    }

    #[test]
    fn test_random_covers_all_directions() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[Direction::random(&mut rng).index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
