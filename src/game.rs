use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{GameConfig, GridSize};
use crate::error::ConfigError;
use crate::food::spawn_position;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Outcome kind of one movement step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MoveStatus {
    /// Plain move.
    Normal,
    /// The head landed on food and the body grew.
    Food,
    /// The head would have entered a wall or the body.
    Fail,
    /// The body reached the target length.
    Success,
}

impl MoveStatus {
    /// Returns true for outcomes after which the game must not advance.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Fail | Self::Success)
    }
}

/// Why a game was lost.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Report produced by every [`GameState::advance`] call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameResult {
    pub elapsed: Duration,
    /// Segments still missing to reach the target length.
    pub remaining: usize,
    /// Growth beyond the initial length.
    pub score: usize,
    pub status: MoveStatus,
}

/// Content of one grid cell in a [`Board`] snapshot.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Cell {
    Blank,
    Wall,
    SnakeHead,
    Snake,
    Food,
}

/// Immutable snapshot of the whole grid, row-major.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Board {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Board {
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the cell at `position`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<Cell> {
        if !position.is_within_bounds(self.size) {
            return None;
        }

        let index = position.y as usize * usize::from(self.size.width) + position.x as usize;
        self.cells.get(index).copied()
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.size.width))
    }

    fn set(&mut self, position: Position, cell: Cell) {
        if position.is_within_bounds(self.size) {
            let index = position.y as usize * usize::from(self.size.width) + position.x as usize;
            self.cells[index] = cell;
        }
    }
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current food cell; `None` once the board has no free cell left or
    /// the target length was reached.
    pub food: Option<Position>,
    snake: Snake,
    walls: HashSet<Position>,
    config: GameConfig,
    death_reason: Option<DeathReason>,
    rng: StdRng,
}

impl GameState {
    /// Builds a game seeded from system entropy.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = config.grid;
        let walls = (0..i32::from(bounds.height))
            .flat_map(|y| (0..i32::from(bounds.width)).map(move |x| Position { x, y }))
            .filter(|position| position.is_on_border(bounds))
            .collect();

        let snake = Snake::serpentine(bounds, config.min_len);
        let food = spawn_position(&mut rng, bounds, &snake);

        info!(
            "new game: {}x{} grid, length {}..{}, head {:?} heading {:?}",
            bounds.width,
            bounds.height,
            config.min_len,
            config.max_len,
            snake.head(),
            snake.heading()
        );

        Ok(Self {
            food,
            snake,
            walls,
            config,
            death_reason: None,
            rng,
        })
    }

    /// Requests a heading for the next step.
    ///
    /// A request that reverses the current heading is dropped.
    pub fn set_heading(&mut self, direction: Direction) {
        if !self.snake.request_heading(direction) {
            debug!(
                "ignored reversal to {direction:?} while heading {:?}",
                self.snake.heading()
            );
        }
    }

    /// Advances simulation by one tick.
    ///
    /// A failed step leaves body and food untouched. Advancing again after a
    /// terminal result is not meaningful.
    pub fn advance(&mut self, elapsed: Duration) -> GameResult {
        let next_head = self.snake.next_head_position();
        self.snake.commit_heading();

        if self.walls.contains(&next_head) || !next_head.is_within_bounds(self.config.grid) {
            return self.fail(DeathReason::WallCollision, elapsed);
        }
        if self.snake.occupies(next_head) {
            return self.fail(DeathReason::SelfCollision, elapsed);
        }

        let vacated = self.snake.shift_to(next_head);

        let ate = self.food == Some(next_head);
        if ate {
            if let Some(vacated) = vacated {
                self.snake.grow_at(vacated);
            }

            self.food = if self.snake.len() < self.config.max_len {
                let food = spawn_position(&mut self.rng, self.config.grid, &self.snake);
                if food.is_none() {
                    warn!("no free cell left for food at length {}", self.snake.len());
                }
                food
            } else {
                None
            };
        }

        let status = if self.snake.len() == self.config.max_len {
            info!("target length {} reached after {elapsed:?}", self.config.max_len);
            MoveStatus::Success
        } else if ate {
            MoveStatus::Food
        } else {
            MoveStatus::Normal
        };

        debug!("tick: head {next_head:?} status {status:?}");
        self.result(status, elapsed)
    }

    fn fail(&mut self, reason: DeathReason, elapsed: Duration) -> GameResult {
        info!(
            "game lost after {elapsed:?}: {reason:?} at length {}",
            self.snake.len()
        );
        self.death_reason = Some(reason);
        self.result(MoveStatus::Fail, elapsed)
    }

    fn result(&self, status: MoveStatus, elapsed: Duration) -> GameResult {
        GameResult {
            elapsed,
            remaining: self.remaining(),
            score: self.score(),
            status,
        }
    }

    /// Snapshots walls, snake and food; every other cell is blank.
    #[must_use]
    pub fn board(&self) -> Board {
        let size = self.config.grid;
        let mut board = Board {
            size,
            cells: vec![Cell::Blank; size.total_cells()],
        };

        for wall in &self.walls {
            board.set(*wall, Cell::Wall);
        }
        if let Some(food) = self.food {
            board.set(food, Cell::Food);
        }
        for segment in self.snake.segments() {
            board.set(*segment, Cell::Snake);
        }
        board.set(self.snake.head(), Cell::SnakeHead);

        board
    }

    /// Returns the growth achieved beyond the initial length.
    #[must_use]
    pub fn score(&self) -> usize {
        self.snake.len().saturating_sub(self.config.min_len)
    }

    /// Returns how many segments are still missing to win.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.config.max_len.saturating_sub(self.snake.len())
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns true when `position` belongs to the wall ring.
    #[must_use]
    pub fn is_wall(&self, position: Position) -> bool {
        self.walls.contains(&position)
    }

    /// Returns the cause of the last failed step, if any.
    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::{GameConfig, GridSize};
    use crate::input::Direction;
    use crate::snake::Position;

    use super::{Cell, DeathReason, GameState, MoveStatus};

    fn config(width: u16, height: u16, min_len: usize, max_len: usize) -> GameConfig {
        GameConfig {
            grid: GridSize { width, height },
            min_len,
            max_len,
            ..GameConfig::default()
        }
    }

    #[test]
    fn construction_rejects_invalid_bounds() {
        let error = GameState::new_with_seed(config(7, 7, 4, 4), 1).unwrap_err();
        assert_eq!(error.parameter(), "max_len");
    }

    #[test]
    fn wall_ring_surrounds_interior() {
        let state = GameState::new_with_seed(config(7, 6, 2, 4), 1).expect("valid config");

        assert!(state.is_wall(Position { x: 0, y: 0 }));
        assert!(state.is_wall(Position { x: 6, y: 3 }));
        assert!(state.is_wall(Position { x: 3, y: 5 }));
        assert!(!state.is_wall(Position { x: 1, y: 1 }));
        assert_eq!(state.walls.len(), 7 * 6 - 5 * 4);
    }

    #[test]
    fn initial_food_is_on_a_free_interior_cell() {
        for seed in 0..20 {
            let state = GameState::new_with_seed(config(7, 7, 5, 10), seed).expect("valid config");
            let food = state.food.expect("initial food is placed");

            assert!(!state.is_wall(food));
            assert!(!state.snake().occupies(food));
        }
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut state = GameState::new_with_seed(config(7, 7, 2, 4), 5).expect("valid config");
        state.food = Some(Position { x: 5, y: 5 });

        let result = state.advance(Duration::from_millis(200));

        assert_eq!(result.status, MoveStatus::Normal);
        assert_eq!(result.elapsed, Duration::from_millis(200));
        assert_eq!(state.snake().head(), Position { x: 3, y: 1 });
        assert_eq!(state.snake().len(), 2);
    }

    #[test]
    fn eating_food_grows_and_rerolls() {
        let mut state = GameState::new_with_seed(config(7, 7, 2, 6), 8).expect("valid config");
        state.food = Some(Position { x: 3, y: 1 });

        let result = state.advance(Duration::ZERO);

        assert_eq!(result.status, MoveStatus::Food);
        assert_eq!(state.snake().len(), 3);
        let food = state.food.expect("food re-rolled below target length");
        assert_ne!(food, Position { x: 3, y: 1 });
        assert!(!state.snake().occupies(food));
    }

    #[test]
    fn moving_into_tail_cell_fails() {
        let mut state = GameState::new_with_seed(config(7, 7, 4, 8), 2).expect("valid config");
        // Body: (4,1) (3,1) (2,1) (1,1); loop back on ourselves.
        state.food = None;
        state.set_heading(Direction::Down);
        state.advance(Duration::ZERO);
        state.set_heading(Direction::Left);
        state.advance(Duration::ZERO);
        state.set_heading(Direction::Up);

        let result = state.advance(Duration::ZERO);

        assert_eq!(result.status, MoveStatus::Fail);
        assert_eq!(state.death_reason(), Some(DeathReason::SelfCollision));
    }

    #[test]
    fn opposite_heading_is_dropped() {
        let mut state = GameState::new_with_seed(config(7, 7, 2, 4), 3).expect("valid config");
        state.food = None;

        state.set_heading(Direction::Left);
        state.advance(Duration::ZERO);

        assert_eq!(state.snake().head(), Position { x: 3, y: 1 });
    }

    #[test]
    fn board_marks_every_entity() {
        let mut state = GameState::new_with_seed(config(7, 7, 2, 4), 4).expect("valid config");
        state.food = Some(Position { x: 5, y: 5 });

        let board = state.board();

        assert_eq!(board.get(Position { x: 0, y: 0 }), Some(Cell::Wall));
        assert_eq!(board.get(Position { x: 2, y: 1 }), Some(Cell::SnakeHead));
        assert_eq!(board.get(Position { x: 1, y: 1 }), Some(Cell::Snake));
        assert_eq!(board.get(Position { x: 5, y: 5 }), Some(Cell::Food));
        assert_eq!(board.get(Position { x: 3, y: 3 }), Some(Cell::Blank));
        assert_eq!(board.get(Position { x: 7, y: 0 }), None);
        assert_eq!(board.rows().count(), 7);
    }

    #[test]
    fn terminal_statuses() {
        assert!(MoveStatus::Fail.is_terminal());
        assert!(MoveStatus::Success.is_terminal());
        assert!(!MoveStatus::Food.is_terminal());
        assert!(!MoveStatus::Normal.is_terminal());
    }
}
