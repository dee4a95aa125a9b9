use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::{AppError, ConfigError};

const APP_DIR_NAME: &str = "console-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Smallest accepted grid edge, wall ring included.
pub const MIN_GRID_EDGE: u16 = 5;

pub const DEFAULT_GRID_WIDTH: u16 = 30;
pub const DEFAULT_GRID_HEIGHT: u16 = 25;
pub const DEFAULT_MIN_LEN: usize = 5;
pub const DEFAULT_MAX_LEN: usize = 15;

/// Base tick interval in milliseconds, before length scaling.
pub const DEFAULT_BASE_TICK_MS: u64 = 1000;

/// Multiplier on the base interval; larger is slower.
pub const DEFAULT_SPEED_FACTOR: f32 = 0.2;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns the number of cells inside the wall ring.
    #[must_use]
    pub fn interior_cells(self) -> usize {
        usize::from(self.width.saturating_sub(2)) * usize::from(self.height.saturating_sub(2))
    }
}

/// Everything needed to build a game and pace its loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub grid: GridSize,
    /// Initial body length; the score counts growth beyond it.
    pub min_len: usize,
    /// Target body length; reaching it wins the game.
    pub max_len: usize,
    pub base_tick_ms: u64,
    pub speed_factor: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
            base_tick_ms: DEFAULT_BASE_TICK_MS,
            speed_factor: DEFAULT_SPEED_FACTOR,
        }
    }
}

impl GameConfig {
    /// Checks grid and length bounds, reporting the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width < MIN_GRID_EDGE {
            return Err(ConfigError::invalid(
                "width",
                format!("must be at least {MIN_GRID_EDGE}, got {}", self.grid.width),
            ));
        }
        if self.grid.height < MIN_GRID_EDGE {
            return Err(ConfigError::invalid(
                "height",
                format!("must be at least {MIN_GRID_EDGE}, got {}", self.grid.height),
            ));
        }

        let interior = self.grid.interior_cells();
        if self.min_len < 1 {
            return Err(ConfigError::invalid("min_len", "must be at least 1"));
        }
        if self.min_len + 1 > interior {
            return Err(ConfigError::invalid(
                "min_len",
                format!(
                    "must not exceed interior cell count minus one ({}), got {}",
                    interior - 1,
                    self.min_len
                ),
            ));
        }
        if self.max_len + 1 > interior {
            return Err(ConfigError::invalid(
                "max_len",
                format!(
                    "must not exceed interior cell count minus one ({}), got {}",
                    interior - 1,
                    self.max_len
                ),
            ));
        }
        if self.max_len <= self.min_len {
            return Err(ConfigError::invalid(
                "max_len",
                format!(
                    "must be greater than min_len ({}), got {}",
                    self.min_len, self.max_len
                ),
            ));
        }

        if self.base_tick_ms == 0 {
            return Err(ConfigError::invalid("base_tick_ms", "must be positive"));
        }
        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(ConfigError::invalid(
                "speed_factor",
                format!("must be a positive finite number, got {}", self.speed_factor),
            ));
        }

        Ok(())
    }
}

/// Optional overrides read from the JSON config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub base_tick_ms: Option<u64>,
    pub speed_factor: Option<f32>,
}

impl GameConfig {
    /// Builds a config from defaults, then `file`, then `overrides`.
    #[must_use]
    pub fn layered(file: Option<FileConfig>, overrides: &FileConfig) -> Self {
        let mut config = Self::default();
        if let Some(file) = file {
            file.apply_to(&mut config);
        }
        overrides.apply_to(&mut config);
        config
    }
}

impl FileConfig {
    /// Writes every present value over `config`.
    pub fn apply_to(&self, config: &mut GameConfig) {
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(min_len) = self.min_len {
            config.min_len = min_len;
        }
        if let Some(max_len) = self.max_len {
            config.max_len = max_len;
        }
        if let Some(base_tick_ms) = self.base_tick_ms {
            config.base_tick_ms = base_tick_ms;
        }
        if let Some(speed_factor) = self.speed_factor {
            config.speed_factor = speed_factor;
        }
    }
}

/// Returns the platform-correct default config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Returns the platform-correct default log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(format!("{APP_DIR_NAME}.log"));
    base
}

/// Loads overrides from `path`.
///
/// Returns `Ok(None)` when the file does not exist and `required` is false.
pub fn load_file_config(path: &Path, required: bool) -> Result<Option<FileConfig>, AppError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => return Ok(None),
        Err(e) => return Err(AppError::Io(e)),
    };

    serde_json::from_str::<FileConfig>(&raw)
        .map(Some)
        .map_err(|source| AppError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Glyph for wall cells.
pub const GLYPH_WALL: &str = "□";

/// Glyph for snake body cells.
pub const GLYPH_SNAKE: &str = "■";

/// Glyph for the food cell.
pub const GLYPH_FOOD: &str = "●";

/// Full-width space used for blank cells.
pub const GLYPH_BLANK: &str = "\u{3000}";

/// Presentation multiplier applied to the raw score.
pub const SCORE_DISPLAY_MULTIPLIER: usize = 100;

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub wall: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_fg: Color,
    pub play_bg: Color,
    pub hud: Color,
    pub title: Color,
    pub footer: Color,
}

/// Dark glyphs on a light board, like a recoloured console.
pub const THEME_CONSOLE: Theme = Theme {
    name: "Console",
    wall: Color::Black,
    snake_head: Color::Blue,
    snake_body: Color::Black,
    food: Color::Red,
    play_fg: Color::Black,
    play_bg: Color::White,
    hud: Color::Yellow,
    title: Color::Yellow,
    footer: Color::DarkGray,
};
