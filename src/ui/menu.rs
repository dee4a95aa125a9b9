use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::{GLYPH_FOOD, GLYPH_SNAKE, GLYPH_WALL, Theme};
use crate::game::{DeathReason, GameResult, MoveStatus};
use crate::ui::hud::{display_score, format_elapsed};

/// Draws the intro screen as a centered popup.
pub fn render_intro_menu(frame: &mut Frame<'_>, area: Rect, target_len: usize, theme: &Theme) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!("Steer the snake made of {GLYPH_SNAKE} with WASD or the arrows")),
        Line::from(format!("Do not hit yourself or the wall made of {GLYPH_WALL}")),
        Line::from(format!("Eat {GLYPH_FOOD} to grow; reach length {target_len} to win")),
        Line::from(""),
        Line::from("Any key: start   [Q]/[Esc]: quit"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("The snake speeds up as it grows"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.footer)),
        footer_row,
    );
}

/// Draws the final outcome as a centered popup.
pub fn render_outcome_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    result: GameResult,
    death_reason: Option<DeathReason>,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 40);
    frame.render_widget(Clear, popup);

    let won = result.status == MoveStatus::Success;
    let lines = vec![
        Line::from(if won { "YOU WIN!" } else { "GAME OVER" }).style(
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Total score: {}", display_score(result.score))),
        Line::from(format!("Total time: {}", format_elapsed(result.elapsed))),
        Line::from(cause_text(death_reason)),
        Line::from(""),
        Line::from("Press any key to exit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(if won { " success " } else { " game over " })),
        popup,
    );
}

fn cause_text(death_reason: Option<DeathReason>) -> &'static str {
    match death_reason {
        Some(DeathReason::WallCollision) => "Cause: hit the wall",
        Some(DeathReason::SelfCollision) => "Cause: hit yourself",
        None => "",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
