use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameState, Outcome, Position, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Random draws before falling back to scanning the free cells
const SPAWN_ATTEMPTS: usize = 64;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// No free cell was left to place new food on
    pub board_full: bool,
}

impl StepInfo {
    /// Why the step ended the episode, if it did
    pub fn end_cause(&self) -> Option<&'static str> {
        match self.collision_type {
            Some(collision) => Some(collision.name()),
            None if self.board_full => Some("board full"),
            None => None,
        }
    }
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Change applied to the score this step
    pub score_delta: i32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that advances a `GameState` one tick at a time
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a new episode
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(
            Position::new(self.config.start_x, self.config.start_y),
            self.config.start_direction,
            self.config.initial_snake_length,
            self.config.cell_size,
        );

        let food = self.spawn_food_avoid_snake(&snake);

        let mut state = GameState::new(
            snake,
            food.unwrap_or_default(),
            self.config.frame_width,
            self.config.frame_height,
            self.config.cell_size,
        );
        if food.is_none() {
            state.outcome = Outcome::GameOver;
        }
        state
    }

    /// Apply `direction` and advance one tick.
    ///
    /// The direction is applied as given, reversal included. Terminal
    /// conditions are evaluated only after the move.
    pub fn step(&mut self, state: &mut GameState, direction: Direction) -> StepResult {
        if !state.is_alive() {
            return StepResult {
                score_delta: 0,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                    board_full: false,
                },
            };
        }

        state.snake.direction = direction;
        let new_head = state.head().stepped(direction, state.cell_size);
        state.snake.body.insert(0, new_head);

        let ate_food = new_head == state.food;
        let score_delta = if ate_food {
            self.config.food_reward
        } else {
            state.snake.body.pop();
            -self.config.step_penalty
        };
        state.score += score_delta;
        state.steps += 1;

        let collision_type = Self::check_collision(state, new_head);

        let mut board_full = false;
        if ate_food && collision_type.is_none() {
            match self.spawn_food_avoid_snake(&state.snake) {
                Some(food) => state.food = food,
                None => board_full = true,
            }
        }

        let terminated = collision_type.is_some() || board_full;
        if terminated {
            state.outcome = Outcome::GameOver;
        }

        StepResult {
            score_delta,
            terminated,
            info: StepInfo {
                ate_food,
                collision_type,
                board_full,
            },
        }
    }

    /// What `step` would report for `direction`, without touching the state or the rng.
    ///
    /// `board_full` is never predicted.
    pub fn preview(state: &GameState, direction: Direction) -> StepInfo {
        let new_head = state.head().stepped(direction, state.cell_size);
        let ate_food = new_head == state.food;

        // Segments that follow the new head once the tail has (or has not) moved.
        let kept = if ate_food {
            state.snake.len()
        } else {
            state.snake.len() - 1
        };

        let collision_type = if !state.is_in_bounds(new_head) {
            Some(CollisionType::Wall)
        } else if state.snake.body[..kept].contains(&new_head) {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        StepInfo {
            ate_food,
            collision_type,
            board_full: false,
        }
    }

    /// One-step look-ahead score used as a dataset target.
    ///
    /// `score + food_reward` if the move eats, `score - step_penalty` if it
    /// survives without eating, `0` if the move ends the episode or the
    /// episode is already over.
    pub fn future_score(&self, state: &GameState, direction: Direction) -> i32 {
        if !state.is_alive() {
            return 0;
        }

        let info = Self::preview(state, direction);
        if info.collision_type.is_some() {
            0
        } else if info.ate_food {
            state.score + self.config.food_reward
        } else {
            state.score - self.config.step_penalty
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(state: &GameState, head: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random free cell.
    ///
    /// Row and column 0 are never used. Returns `None` when no free cell is left.
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Option<Position> {
        let cols = self.config.cols();
        let rows = self.config.rows();
        let cell = self.config.cell_size;
        if cols < 2 || rows < 2 {
            return None;
        }

        for _ in 0..SPAWN_ATTEMPTS {
            let x = self.rng.gen_range(1..cols) * cell;
            let y = self.rng.gen_range(1..rows) * cell;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (1..rows)
            .flat_map(|row| (1..cols).map(move |col| Position::new(col * cell, row * cell)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        if free.is_empty() {
            None
        } else {
            Some(free[self.rng.gen_range(0..free.len())])
        }
    }
}
