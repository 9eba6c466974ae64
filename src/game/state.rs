use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A position in frame coordinates, aligned to the cell grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    /// Move position one cell in a direction
    pub fn stepped(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * cell_size, dy * cell_size)
    }

    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current facing
    pub direction: Direction,
}

impl Snake {
    /// Create a straight snake whose body trails behind the head
    pub fn new(head: Position, direction: Direction, length: usize, cell_size: i32) -> Self {
        let mut body = Vec::with_capacity(length.max(1));
        body.push(head);

        let back = direction.opposite();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.stepped(back, cell_size));
        }

        Self { body, direction }
    }

    /// Create a snake from explicit segments, head first
    pub fn from_body(body: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!body.is_empty(), "snake body must have a head");
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if position is any occupied cell, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that ended an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionType {
    /// Snake left the frame
    Wall,
    /// Snake hit itself
    SelfCollision,
}

impl CollisionType {
    pub fn name(&self) -> &'static str {
        match self {
            CollisionType::Wall => "wall",
            CollisionType::SelfCollision => "self",
        }
    }
}

/// Terminal flag of an episode. Only the engine sets `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Continue,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub frame_width: i32,
    pub frame_height: i32,
    pub cell_size: i32,
    pub score: i32,
    pub steps: u32,
    pub outcome: Outcome,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Position,
        frame_width: i32,
        frame_height: i32,
        cell_size: i32,
    ) -> Self {
        Self {
            snake,
            food,
            frame_width,
            frame_height,
            cell_size,
            score: 0,
            steps: 0,
            outcome: Outcome::Continue,
        }
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    pub fn is_alive(&self) -> bool {
        self.outcome == Outcome::Continue
    }

    /// Check if a position is within the frame: `0..=width-cell` on x, likewise on y
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x <= self.frame_width - self.cell_size
            && pos.y >= 0
            && pos.y <= self.frame_height - self.cell_size
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Number of cells in the frame, saturating at `usize::MAX`
    pub fn cell_count(&self) -> usize {
        let cols = (self.frame_width / self.cell_size).max(0) as usize;
        let rows = (self.frame_height / self.cell_size).max(0) as usize;
        cols.saturating_mul(rows)
    }

    /// Signed distance from head to food along x
    pub fn horizontal_distance(&self) -> i32 {
        self.food.x - self.head().x
    }

    /// Signed distance from head to food along y
    pub fn vertical_distance(&self) -> i32 {
        self.food.y - self.head().y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(50, 50);
        assert_eq!(pos.moved_by(10, 0), Position::new(60, 50));
        assert_eq!(pos.stepped(Direction::Left, 10), Position::new(40, 50));
        assert_eq!(pos.stepped(Direction::Down, 10), Position::new(50, 60));
        assert_eq!(pos.stepped(Direction::Up, 10), Position::new(50, 40));
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(100, 50);
        let b = Position::new(70, 90);
        assert_eq!(a.manhattan_distance(b), 70);
        assert_eq!(b.manhattan_distance(a), 70);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(100, 50), Direction::Right, 3, 10);
        assert_eq!(
            snake.body,
            vec![
                Position::new(100, 50),
                Position::new(90, 50),
                Position::new(80, 50)
            ]
        );
        assert_eq!(snake.head(), Position::new(100, 50));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::new(Position::new(50, 50), Direction::Right, 3, 10);
        assert!(!snake.collides_with_body(Position::new(50, 50))); // head
        assert!(snake.occupies(Position::new(50, 50)));
        assert!(snake.collides_with_body(Position::new(40, 50))); // body
        assert!(!snake.collides_with_body(Position::new(100, 100))); // empty
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(100, 50), Direction::Right, 3, 10),
            Position::new(200, 200),
            480,
            480,
            10,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(470, 470)));
        assert!(!state.is_in_bounds(Position::new(-10, 0)));
        assert!(!state.is_in_bounds(Position::new(480, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 480)));
        assert_eq!(state.cell_count(), 48 * 48);
    }

    #[test]
    fn test_cell_count_on_large_frame() {
        let state = GameState::new(
            Snake::new(Position::new(100, 50), Direction::Right, 3, 1),
            Position::new(10, 10),
            50_000,
            50_000,
            1,
        );
        assert_eq!(state.cell_count(), 2_500_000_000);
    }

    #[test]
    fn test_food_distances() {
        let state = GameState::new(
            Snake::new(Position::new(100, 50), Direction::Right, 3, 10),
            Position::new(70, 90),
            480,
            480,
            10,
        );
        assert_eq!(state.horizontal_distance(), -30);
        assert_eq!(state.vertical_distance(), 40);
        assert!(state.is_alive());
    }
}
