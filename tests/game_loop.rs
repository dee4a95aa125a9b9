use std::collections::VecDeque;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

use console_snake::config::{GameConfig, GridSize};
use console_snake::driver::{GameLoop, InputSource};
use console_snake::game::{Cell, GameState, MoveStatus};
use console_snake::input::{Direction, GameInput};
use console_snake::snake::Position;

/// Replays a fixed list of inputs, then stays idle.
struct ScriptedInput(VecDeque<GameInput>);

impl ScriptedInput {
    fn new(inputs: impl IntoIterator<Item = GameInput>) -> Self {
        Self(inputs.into_iter().collect())
    }

    fn idle() -> Self {
        Self(VecDeque::new())
    }
}

impl InputSource for ScriptedInput {
    fn next_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        match self.0.pop_front() {
            Some(input) => Ok(Some(input)),
            None => {
                thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

struct FailingInput;

impl InputSource for FailingInput {
    fn next_input(&mut self, _timeout: Duration) -> io::Result<Option<GameInput>> {
        Err(io::Error::other("keyboard unplugged"))
    }
}

fn state_without_food(base_tick_ms: u64) -> GameState {
    let config = GameConfig {
        grid: GridSize {
            width: 7,
            height: 7,
        },
        min_len: 2,
        max_len: 4,
        base_tick_ms,
        speed_factor: 1.0,
    };
    let mut state = GameState::new_with_seed(config, 21).expect("valid config");
    state.food = None;
    state
}

#[test]
fn ticks_arrive_in_order_until_wall_collision() {
    let (mut game, ticks) = GameLoop::new(state_without_food(1)).start(ScriptedInput::idle());

    let statuses: Vec<MoveStatus> = ticks.iter().map(|event| event.result.status).collect();

    assert_eq!(
        statuses,
        vec![
            MoveStatus::Normal,
            MoveStatus::Normal,
            MoveStatus::Normal,
            MoveStatus::Fail,
        ]
    );
    assert!(game.stop_signal().is_raised());
    game.stop().expect("input activity ends cleanly");
}

#[test]
fn failed_tick_reports_pre_move_board() {
    let (mut game, ticks) = GameLoop::new(state_without_food(1)).start(ScriptedInput::idle());

    let events: Vec<_> = ticks.iter().collect();
    let last = events.last().expect("at least one tick");
    let before_last = &events[events.len() - 2];

    assert_eq!(last.result.status, MoveStatus::Fail);
    assert_eq!(last.board, before_last.board);
    assert_eq!(last.board.get(Position { x: 5, y: 1 }), Some(Cell::SnakeHead));
    game.stop().expect("input activity ends cleanly");
}

#[test]
fn direction_input_reaches_the_next_tick() {
    let (mut game, ticks) = GameLoop::new(state_without_food(50))
        .start(ScriptedInput::new([GameInput::Direction(Direction::Down)]));

    let first = ticks.recv().expect("first tick is delivered");

    assert_eq!(first.result.status, MoveStatus::Normal);
    assert_eq!(first.board.get(Position { x: 2, y: 2 }), Some(Cell::SnakeHead));
    game.stop().expect("input activity ends cleanly");
}

#[test]
fn quit_input_closes_the_tick_channel() {
    let started = Instant::now();
    let (mut game, ticks) =
        GameLoop::new(state_without_food(5_000)).start(ScriptedInput::new([GameInput::Quit]));

    assert_eq!(ticks.iter().count(), 0);
    assert!(started.elapsed() < Duration::from_secs(5));
    game.stop().expect("input activity ends cleanly");
}

#[test]
fn stop_interrupts_a_long_tick_wait() {
    let (mut game, ticks) = GameLoop::new(state_without_food(5_000)).start(ScriptedInput::idle());

    let started = Instant::now();
    game.stop().expect("input activity ends cleanly");

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(ticks.recv().is_err());
    assert_eq!(game.board().get(Position { x: 2, y: 1 }), Some(Cell::SnakeHead));
}

#[test]
fn input_failure_stops_the_game_and_is_reported() {
    let (mut game, ticks) = GameLoop::new(state_without_food(5_000)).start(FailingInput);

    assert_eq!(ticks.iter().count(), 0);
    assert!(game.stop().is_err());
}
