use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use log::{debug, error, info};

use crate::config::GameConfig;
use crate::game::{Board, GameResult, GameState};
use crate::input::{GameInput, map_key};

/// Longest uninterrupted sleep; bounds how late a stop request is noticed.
const STOP_POLL_SLICE: Duration = Duration::from_millis(16);

/// How long the input activity waits for a key before re-checking the stop signal.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Returns the pause before the next tick for a body of `body_len` segments.
///
/// `base_tick_ms * speed_factor * max_len / body_len`, so the game speeds
/// up as the snake grows.
#[must_use]
pub fn tick_interval(config: &GameConfig, body_len: usize) -> Duration {
    let body_len = body_len.max(1) as f64;
    let millis = config.base_tick_ms as f64
        * f64::from(config.speed_factor)
        * config.max_len as f64
        / body_len;

    Duration::from_millis(millis.round().max(1.0) as u64)
}

/// Cooperative cancellation flag shared by the loop activities.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration` in short slices. Returns true when the signal
    /// was raised before the full duration elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_raised() {
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep((deadline - now).min(STOP_POLL_SLICE));
        }
    }
}

/// Source of directional requests for a running game.
pub trait InputSource: Send {
    /// Waits at most `timeout` for the next input.
    fn next_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>>;
}

/// Reads key presses from the terminal.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn next_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

/// One completed tick, as delivered to the presentation layer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TickEvent {
    pub result: GameResult,
    pub board: Board,
}

/// Prepared game that has not started ticking yet.
#[derive(Debug)]
pub struct GameLoop {
    state: Arc<Mutex<GameState>>,
    config: GameConfig,
}

impl GameLoop {
    #[must_use]
    pub fn new(state: GameState) -> Self {
        let config = *state.config();
        Self {
            state: Arc::new(Mutex::new(state)),
            config,
        }
    }

    /// Starts the clock, the ticking activity, and the input activity.
    ///
    /// Exactly one [`TickEvent`] is sent per completed tick, in tick order.
    /// The channel closes once the game reaches a terminal result or is
    /// stopped.
    pub fn start<I>(self, input: I) -> (RunningGame, Receiver<TickEvent>)
    where
        I: InputSource + 'static,
    {
        let stop = StopSignal::new();
        let (sender, receiver) = mpsc::channel();

        info!(
            "starting game loop: base {} ms, factor {}",
            self.config.base_tick_ms, self.config.speed_factor
        );

        let ticker = {
            let state = Arc::clone(&self.state);
            let stop = stop.clone();
            let config = self.config;
            thread::Builder::new()
                .name("snake-ticker".to_owned())
                .spawn(move || run_ticker(&state, &config, &stop, &sender))
        };

        let input_thread = {
            let state = Arc::clone(&self.state);
            let stop = stop.clone();
            thread::Builder::new()
                .name("snake-input".to_owned())
                .spawn(move || run_input(&state, &stop, input))
        };

        let running = RunningGame {
            state: self.state,
            stop,
            ticker: None,
            input: None,
        };
        (running.attach(ticker, input_thread), receiver)
    }
}

/// Handle to a started game; stopping it joins both activities.
#[derive(Debug)]
pub struct RunningGame {
    state: Arc<Mutex<GameState>>,
    stop: StopSignal,
    ticker: Option<JoinHandle<()>>,
    input: Option<JoinHandle<io::Result<()>>>,
}

impl RunningGame {
    fn attach(
        mut self,
        ticker: io::Result<JoinHandle<()>>,
        input: io::Result<JoinHandle<io::Result<()>>>,
    ) -> Self {
        match ticker {
            Ok(handle) => self.ticker = Some(handle),
            Err(spawn_error) => {
                error!("failed to spawn ticker: {spawn_error}");
                self.stop.raise();
            }
        }
        match input {
            Ok(handle) => self.input = Some(handle),
            Err(spawn_error) => {
                error!("failed to spawn input reader: {spawn_error}");
                self.stop.raise();
            }
        }
        self
    }

    /// Returns the shared cancellation flag.
    #[must_use]
    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Snapshots the current board.
    #[must_use]
    pub fn board(&self) -> Board {
        lock(&self.state).board()
    }

    /// Runs `f` with shared access to the game state.
    pub fn with_state<T>(&self, f: impl FnOnce(&GameState) -> T) -> T {
        f(&lock(&self.state))
    }

    /// Raises the stop signal and waits for both activities to finish.
    ///
    /// Returns the input activity's error, if it failed.
    pub fn stop(&mut self) -> io::Result<()> {
        self.stop.raise();

        if let Some(ticker) = self.ticker.take() {
            if ticker.join().is_err() {
                error!("ticker thread panicked");
            }
        }

        match self.input.take().map(JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(io::Error::other("input thread panicked")),
            None => Ok(()),
        }
    }
}

impl Drop for RunningGame {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn lock(state: &Mutex<GameState>) -> MutexGuard<'_, GameState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_ticker(
    state: &Mutex<GameState>,
    config: &GameConfig,
    stop: &StopSignal,
    sender: &Sender<TickEvent>,
) {
    let clock = Instant::now();

    while !stop.is_raised() {
        let interval = tick_interval(config, lock(state).snake().len());
        if stop.sleep(interval) {
            break;
        }

        let event = {
            let mut state = lock(state);
            let result = state.advance(clock.elapsed());
            TickEvent {
                result,
                board: state.board(),
            }
        };

        let terminal = event.result.status.is_terminal();
        if sender.send(event).is_err() {
            debug!("presentation receiver dropped; stopping ticker");
            stop.raise();
            break;
        }

        if terminal {
            stop.raise();
            break;
        }
    }

    info!("ticker stopped after {:?}", clock.elapsed());
}

fn run_input<I: InputSource>(
    state: &Mutex<GameState>,
    stop: &StopSignal,
    mut input: I,
) -> io::Result<()> {
    while !stop.is_raised() {
        let next = match input.next_input(INPUT_POLL_INTERVAL) {
            Ok(next) => next,
            Err(read_error) => {
                error!("input read failed: {read_error}");
                stop.raise();
                return Err(read_error);
            }
        };

        match next {
            Some(GameInput::Direction(direction)) => lock(state).set_heading(direction),
            Some(GameInput::Quit) => {
                info!("quit requested");
                stop.raise();
            }
            None => {}
        }
    }

    Ok(())
}
