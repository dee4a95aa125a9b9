use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use unicode_width::UnicodeWidthStr;

use crate::config::{GLYPH_BLANK, GLYPH_FOOD, GLYPH_SNAKE, GLYPH_WALL, GridSize, Theme};
use crate::game::{Board, Cell, DeathReason, GameResult};
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_intro_menu, render_outcome_menu};

/// Which overlay, if any, sits on top of the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Screen {
    Intro,
    Playing,
    Finished {
        result: GameResult,
        death_reason: Option<DeathReason>,
    },
}

/// Everything one frame needs, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub board: &'a Board,
    pub last_result: Option<GameResult>,
    pub target_len: usize,
    pub screen: Screen,
    pub theme: &'a Theme,
}

/// Renders the full game frame from an immutable board snapshot.
pub fn render(frame: &mut Frame<'_>, view: &FrameView<'_>) {
    let area = frame.area();
    let play_area = render_hud(
        frame,
        area,
        &HudInfo {
            last_result: view.last_result,
            theme: view.theme,
        },
    );

    let cell_width = cell_width();
    let board_area = centered_board_area(play_area, view.board.size(), cell_width);
    render_board(frame, board_area, view.board, cell_width, view.theme);

    match view.screen {
        Screen::Intro => render_intro_menu(frame, play_area, view.target_len, view.theme),
        Screen::Finished {
            result,
            death_reason,
        } => render_outcome_menu(frame, play_area, result, death_reason, view.theme),
        Screen::Playing => {}
    }
}

/// Terminal columns per logical cell, wide enough for every glyph.
#[must_use]
pub fn cell_width() -> u16 {
    [GLYPH_WALL, GLYPH_SNAKE, GLYPH_FOOD, GLYPH_BLANK]
        .iter()
        .map(|glyph| glyph.width())
        .max()
        .unwrap_or(1)
        .clamp(1, 2) as u16
}

fn centered_board_area(area: Rect, size: GridSize, cell_width: u16) -> Rect {
    let width = size.width.saturating_mul(cell_width).min(area.width);
    let height = size.height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_board(frame: &mut Frame<'_>, area: Rect, board: &Board, cell_width: u16, theme: &Theme) {
    let buffer = frame.buffer_mut();

    for (row_index, row) in board.rows().enumerate() {
        let Ok(row_offset) = u16::try_from(row_index) else {
            break;
        };
        let y = area.y.saturating_add(row_offset);
        if y >= area.bottom() {
            break;
        }

        for (column_index, cell) in row.iter().enumerate() {
            let Ok(column_offset) = u16::try_from(column_index) else {
                break;
            };
            let x = area.x.saturating_add(column_offset.saturating_mul(cell_width));
            if x.saturating_add(cell_width) > area.right() {
                break;
            }

            let (glyph, style) = cell_appearance(*cell, theme);
            buffer.set_stringn(
                x,
                y,
                padded_glyph(glyph, cell_width),
                usize::from(cell_width),
                style,
            );
        }
    }
}

fn cell_appearance(cell: Cell, theme: &Theme) -> (&'static str, Style) {
    let base = Style::new().fg(theme.play_fg).bg(theme.play_bg);
    match cell {
        Cell::Blank => (GLYPH_BLANK, base),
        Cell::Wall => (GLYPH_WALL, base.fg(theme.wall)),
        Cell::SnakeHead => (
            GLYPH_SNAKE,
            base.fg(theme.snake_head).add_modifier(Modifier::BOLD),
        ),
        Cell::Snake => (GLYPH_SNAKE, base.fg(theme.snake_body)),
        Cell::Food => (GLYPH_FOOD, base.fg(theme.food)),
    }
}

/// Pads `glyph` with spaces to exactly `cell_width` columns.
fn padded_glyph(glyph: &str, cell_width: u16) -> String {
    let padding = usize::from(cell_width).saturating_sub(glyph.width());
    format!("{glyph}{}", " ".repeat(padding))
}
