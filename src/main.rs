use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use clap::Parser;
use console_snake::config::{
    FileConfig, GameConfig, THEME_CONSOLE, default_config_path, default_log_path,
    load_file_config,
};
use console_snake::driver::{GameLoop, TerminalInput};
use console_snake::error::AppError;
use console_snake::game::{Board, GameResult, GameState};
use console_snake::input::GameInput;
use console_snake::renderer::{self, FrameView, Screen};
use console_snake::terminal_runtime::{TerminalSession, install_panic_hook, wait_for_key};
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Grid width including the wall ring.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height including the wall ring.
    #[arg(long)]
    height: Option<u16>,

    /// Initial snake length.
    #[arg(long)]
    min_len: Option<usize>,

    /// Snake length that wins the game.
    #[arg(long)]
    max_len: Option<usize>,

    /// Base tick interval in milliseconds.
    #[arg(long)]
    base_tick_ms: Option<u64>,

    /// Tick interval multiplier; larger is slower.
    #[arg(long)]
    speed_factor: Option<f32>,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file; defaults to the per-user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file path.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log every tick and rejected turn.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            width: self.width,
            height: self.height,
            min_len: self.min_len,
            max_len: self.max_len,
            base_tick_ms: self.base_tick_ms,
            speed_factor: self.speed_factor,
        }
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = resolve_config(&cli)?;
    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(config, seed)?,
        None => GameState::new(config)?,
    };

    install_panic_hook();

    let mut session = TerminalSession::enter()?;
    let outcome = run(&mut session, state);
    drop(session);

    if let Err(error) = &outcome {
        log::error!("game aborted: {error}");
    }
    outcome
}

fn run(session: &mut TerminalSession, state: GameState) -> Result<(), AppError> {
    let target_len = state.config().max_len;
    let mut board = state.board();
    let mut last_result: Option<GameResult> = None;

    draw(session, &board, last_result, target_len, Screen::Intro)?;
    if wait_for_key()? == Some(GameInput::Quit) {
        info!("quit from intro screen");
        return Ok(());
    }

    draw(session, &board, last_result, target_len, Screen::Playing)?;
    let (mut game, ticks) = GameLoop::new(state).start(TerminalInput);

    for event in &ticks {
        board = event.board;
        last_result = Some(event.result);
        draw(session, &board, last_result, target_len, Screen::Playing)?;
    }

    game.stop()?;

    let Some(result) = last_result.filter(|result| result.status.is_terminal()) else {
        info!("game stopped before a final result");
        return Ok(());
    };

    let death_reason = game.with_state(GameState::death_reason);
    info!(
        "final result {:?}: score {} in {:?}",
        result.status, result.score, result.elapsed
    );

    draw(
        session,
        &board,
        last_result,
        target_len,
        Screen::Finished {
            result,
            death_reason,
        },
    )?;
    wait_for_key()?;

    Ok(())
}

fn draw(
    session: &mut TerminalSession,
    board: &Board,
    last_result: Option<GameResult>,
    target_len: usize,
    screen: Screen,
) -> io::Result<()> {
    let view = FrameView {
        board,
        last_result,
        target_len,
        screen,
        theme: &THEME_CONSOLE,
    };

    session
        .terminal_mut()
        .draw(|frame| renderer::render(frame, &view))?;
    Ok(())
}

/// Layers defaults, the config file, and command-line flags.
fn resolve_config(cli: &Cli) -> Result<GameConfig, AppError> {
    let file = match (&cli.config, default_config_path()) {
        (Some(path), _) => load_file_config(path, true)?,
        (None, Some(path)) => load_file_config(&path, false)?,
        (None, None) => None,
    };

    Ok(GameConfig::layered(file, &cli.overrides()))
}

fn init_logging(cli: &Cli) {
    let path = cli.log_file.clone().unwrap_or_else(default_log_path);
    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| File::create(&path));

    match file {
        Ok(file) => {
            if let Err(error) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("Failed to initialise logging: {error}");
            }
        }
        Err(error) => eprintln!("Failed to open log file {}: {error}", path.display()),
    }
}
