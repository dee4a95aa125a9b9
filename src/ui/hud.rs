use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::{SCORE_DISPLAY_MULTIPLIER, Theme};
use crate::game::GameResult;

/// Values displayed by the status row.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    /// Latest tick report; `None` before the first tick.
    pub last_result: Option<GameResult>,
    pub theme: &'a Theme,
}

/// Renders the status row and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, info: &HudInfo<'_>) -> Rect {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let line = match info.last_result {
        Some(result) => status_line(result, info.theme),
        None => Line::from(Span::styled(
            "Waiting for the first move",
            Style::default().fg(info.theme.footer),
        )),
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), status_area);

    play_area
}

fn status_line(result: GameResult, theme: &Theme) -> Line<'static> {
    let label = Style::default().fg(theme.footer);
    let value = Style::default()
        .fg(theme.hud)
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled("Time ", label),
        Span::styled(format_elapsed(result.elapsed), value),
        Span::styled("  Score ", label),
        Span::styled(display_score(result.score).to_string(), value),
        Span::styled("  Remaining ", label),
        Span::styled(result.remaining.to_string(), value),
    ])
}

/// Scales the raw score for display.
#[must_use]
pub fn display_score(score: usize) -> usize {
    score.saturating_mul(SCORE_DISPLAY_MULTIPLIER)
}

/// Formats elapsed play time as `mm:ss.mmm`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}.{:03}",
        total_secs / 60,
        total_secs % 60,
        elapsed.subsec_millis()
    )
}
