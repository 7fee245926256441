use std::fmt;

use rand::Rng;

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Fixed-size playing field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
}

impl Board {
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "board dimensions must be positive, got {width}x{height}"
        );
        Self { width, height }
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Every cell, row by row starting at `y = 0`
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(
            rng.gen_range(0..self.width) as i32,
            rng.gen_range(0..self.height) as i32,
        )
    }
}

/// Stable handle of a snake inside one simulation
///
/// The simulation owns every snake; entity stacks, death causes and the
/// trainer's bookkeeping only hold this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnakeId(pub usize);

impl SnakeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SnakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snake#{}", self.0)
    }
}

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Snake hit a wall
    CollidedWithWall,
    /// Snake's head ran into its own body
    CollidedWithSelf,
    /// Snake lost a collision against another snake
    CollidedWithEnemy(SnakeId),
    /// Health dropped to zero
    RanOutOfHealth,
}

/// A snake in a multi-snake game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    id: SnakeId,
    /// Body segments, with head at index 0
    pub(crate) body: Vec<Position>,
    pub(crate) health: i32,
    pub(crate) steps_survived: u32,
    pub(crate) kills: u32,
    pub(crate) death: Option<DeathCause>,
}

impl Snake {
    /// Create a snake with every segment stacked on `head`
    pub fn new(id: SnakeId, head: Position, length: usize, health: i32) -> Self {
        Self {
            id,
            body: vec![head; length.max(1)],
            health,
            steps_survived: 0,
            kills: 0,
            death: None,
        }
    }

    pub fn id(&self) -> SnakeId {
        self.id
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn steps_survived(&self) -> u32 {
        self.steps_survived
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    /// Advance the head one cell and drop the tail
    pub(crate) fn advance(&mut self, direction: Direction) {
        let new_head = direction.apply(self.head());
        self.body.insert(0, new_head);
        self.body.pop();
    }

    /// Grow by one segment by duplicating the tail
    pub(crate) fn grow(&mut self) {
        let tail = self.tail();
        self.body.push(tail);
    }
}
