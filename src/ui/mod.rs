mod card;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::theme::Theme;
use crate::view::{Controls, ResultView};

use card::{draw_card_grid, grid_columns, grid_rows, CARD_HEIGHT};

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3),               // Header
            Constraint::Length(1),               // Info line
            Constraint::Min(CARD_HEIGHT),        // Results
            Constraint::Length(1),               // Footer
        ])
        .split(area);

    draw_header(f, &app.theme, chunks[0]);
    draw_info_line(f, app, chunks[1]);
    draw_results(f, app, chunks[2]);
    draw_footer(f, &app.theme, chunks[3]);

    if app.popup == Popup::Help {
        draw_help_popup(f, &app.theme);
    }
}

fn draw_header(f: &mut Frame, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Rick and Morty Episodes",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Explore the multiverse of adventures!",
            Style::default().fg(theme.text).add_modifier(Modifier::ITALIC),
        )),
    ];

    let header = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(theme.header)))
        .style(Style::default().bg(theme.header));

    f.render_widget(header, area);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    // Priority: status message > page summary > current page
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(theme.accent)))
    } else if let Some(info) = app.query.info() {
        Line::from(vec![
            Span::styled(
                format!("Page {} of {}", app.pager.current(), info.pages),
                Style::default().fg(theme.text),
            ),
            Span::styled(" │ ", Style::default().fg(theme.text_dim)),
            Span::styled(format!("{} episodes", info.count), Style::default().fg(theme.text_dim)),
        ])
    } else {
        Line::from(Span::styled(
            format!("Page {}", app.pager.current()),
            Style::default().fg(theme.text_dim),
        ))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_results(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    match ResultView::derive(&app.pager, &app.query) {
        ResultView::Loading => draw_centered_message(f, area, "Loading...", Style::default().fg(theme.text)),
        ResultView::Errored => draw_centered_message(
            f,
            area,
            "Error",
            Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
        ),
        ResultView::Ready { cards, controls, .. } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(3)])
                .split(area);

            if cards.is_empty() {
                draw_centered_message(f, chunks[0], "No episodes on this page", Style::default().fg(theme.text_dim));
                app.scroll = 0;
            } else {
                // Keep the last row of cards reachable but no further
                let visible_rows = (chunks[0].height / CARD_HEIGHT).max(1) as usize;
                let total_rows = grid_rows(cards.len(), grid_columns(chunks[0].width));
                let scroll = app.scroll.min(total_rows.saturating_sub(visible_rows));

                draw_card_grid(f, theme, cards, scroll, chunks[0]);
                app.scroll = scroll;
            }

            draw_controls(f, &app.theme, controls, chunks[1]);
        }
    }
}

fn draw_centered_message(f: &mut Frame, area: Rect, message: &str, style: Style) {
    let lines = vec![Line::from(""), Line::from(Span::styled(message, style))];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_controls(f: &mut Frame, theme: &Theme, controls: Controls, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(0),
            Constraint::Length(16),
        ])
        .split(area);

    f.render_widget(button(theme, "◀ Previous", controls.previous_enabled), chunks[0]);
    f.render_widget(button(theme, "Next ▶", controls.next_enabled), chunks[2]);
}

fn button<'a>(theme: &Theme, label: &'a str, enabled: bool) -> Paragraph<'a> {
    let color = if enabled { theme.accent } else { theme.disabled };
    let label_style = if enabled {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color).add_modifier(Modifier::DIM)
    };

    Paragraph::new(Line::from(Span::styled(label, label_style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
}

fn draw_footer(f: &mut Frame, theme: &Theme, area: Rect) {
    let hints: Vec<(&str, &str)> = vec![
        ("←", "Prev"),
        ("→", "Next"),
        ("↑↓", "Scroll"),
        ("r", "Refresh"),
        ("h", "Help"),
        ("q", "Quit"),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(32)])
        .split(area);

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 2 } else if area.width < 80 { 4 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(theme.text_dim)),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(hint_spans)), chunks[0]);

    let copyright = Paragraph::new(Span::styled(
        "© 2024 Rick and Morty Fan Page",
        Style::default().fg(theme.header),
    ))
    .alignment(Alignment::Right);
    f.render_widget(copyright, chunks[1]);
}

fn draw_help_popup(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 90 } else { 60 },
        area
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(theme.header).add_modifier(Modifier::BOLD)))
    };
    let binding = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(theme.accent)),
            Span::raw(action),
        ])
    };

    let help_text = vec![
        section("═══ Pages ═══"),
        binding("  ←/p/PgUp   ", "Previous page"),
        binding("  →/n/PgDn   ", "Next page"),
        binding("  r          ", "Fetch the current page again"),
        Line::from(""),
        section("═══ Cards ═══"),
        binding("  ↑/↓ k/j    ", "Scroll through the episode cards"),
        Line::from(""),
        section("═══ Command Line ═══"),
        binding("  portal --page 2      ", "Start on page 2"),
        binding("  portal --json        ", "Print a page as JSON"),
        binding("  portal --endpoint U  ", "Use another GraphQL endpoint"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(theme.text_dim)),
            Span::styled("h", Style::default().fg(theme.accent)),
            Span::styled("/", Style::default().fg(theme.text_dim)),
            Span::styled("?", Style::default().fg(theme.accent)),
            Span::styled("/", Style::default().fg(theme.text_dim)),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::styled(" to close", Style::default().fg(theme.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" portal Help ", Style::default().fg(theme.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
