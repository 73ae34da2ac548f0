//! Episode cards and the grid they are laid out in

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::Episode;
use crate::theme::Theme;

/// Rows taken by one card, borders included
pub const CARD_HEIGHT: u16 = 5;

/// Column count for a given width: 1 on narrow terminals up to 4 on wide ones
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=99 => 2,
        100..=139 => 3,
        _ => 4,
    }
}

/// Number of card rows needed for `cards` episodes
pub fn grid_rows(cards: usize, columns: usize) -> usize {
    cards.div_ceil(columns.max(1))
}

pub fn draw_episode_card(f: &mut Frame, theme: &Theme, episode: &Episode, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", episode.name),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let air_date = if episode.air_date.is_empty() {
        "Air date unknown"
    } else {
        episode.air_date.as_str()
    };

    let lines = vec![
        Line::from(Span::styled(
            &episode.episode,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(air_date, Style::default().fg(theme.text))),
        Line::from(Span::styled(format!("#{}", episode.id), Style::default().fg(theme.text_dim))),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the cards starting at card row `scroll`, as many rows as fit
pub fn draw_card_grid(f: &mut Frame, theme: &Theme, cards: &[Episode], scroll: usize, area: Rect) {
    let columns = grid_columns(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (row_area, row_cards) in row_areas.iter().zip(cards.chunks(columns).skip(scroll)) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (cell, episode) in cells.iter().zip(row_cards) {
            draw_episode_card(f, theme, episode, *cell);
        }
    }
}
