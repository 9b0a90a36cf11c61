mod board;
mod help;
mod helpers;
mod settings;
mod theme;

use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, AppView, NewTimerField, NewTimerPopup};
use crate::countdown::format_remaining;
use crate::types::{TimerId, TimerTheme};
use theme::{Palette, timer_colors};

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = Palette::of(app.store.prefs().app_theme);
    let now = Utc::now();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, layout[0], &palette);

    let cards = match app.view {
        AppView::Board => render_board_body(frame, layout[1], app, &palette, now),
        AppView::Settings => {
            render_text_body(
                frame,
                layout[1],
                app,
                &palette,
                "Settings",
                settings::build_settings_text(app, &palette),
            );
            Vec::new()
        }
        AppView::Help => {
            render_text_body(
                frame,
                layout[1],
                app,
                &palette,
                "Help",
                help::build_help_text(&palette),
            );
            Vec::new()
        }
    };

    let footer = Paragraph::new(Text::from(footer_line(app, &palette, now)))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(palette.secondary)),
        );
    frame.render_widget(footer, layout[2]);

    render_confetti(frame, app, &cards, now);

    if let Some(popup) = &app.new_timer_popup {
        render_new_timer_popup(frame, popup, &palette);
    }
}

fn render_header(frame: &mut Frame, area: Rect, palette: &Palette) {
    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  Downtick  ",
            Style::default().fg(Color::Black).bg(palette.primary),
        ),
        Span::raw(" "),
        Span::styled(
            "countdown timers",
            Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(palette.secondary)),
        );
    frame.render_widget(header, area);
}

/// Board body: card widgets with a keybind strip pinned at the bottom.
fn render_board_body(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    palette: &Palette,
    now: DateTime<Utc>,
) -> Vec<(TimerId, Rect)> {
    let count = app.store.timers().len();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(palette.secondary))
        .title(Span::styled(
            format!(" Timers ({count}) "),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return Vec::new();
    }

    let strip_height = inner.height.min(3);
    let cards_area = Rect {
        height: inner.height - strip_height,
        ..inner
    };
    let strip_area = Rect {
        y: inner.y + cards_area.height,
        height: strip_height,
        ..inner
    };

    let cards = board::render_board(frame, cards_area, app, palette, now);

    let mut strip_lines = vec![Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(palette.dim),
    ))];
    strip_lines.extend(keybinds_lines(app, palette));
    frame.render_widget(Paragraph::new(Text::from(strip_lines)), strip_area);

    cards
}

/// Settings and help bodies share one shape: a heading, the view's
/// lines, then the keybind strip.
fn render_text_body(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    palette: &Palette,
    title: &str,
    text: Text<'_>,
) {
    let mut body_lines = vec![
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    body_lines.extend(text.lines);
    body_lines.push(Line::from(""));
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(palette.dim),
    )));
    body_lines.extend(keybinds_lines(app, palette));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(palette.text))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(palette.secondary)),
        );
    frame.render_widget(body, area);
}

fn keybinds_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    let (primary, secondary) = match app.view {
        AppView::Board => (
            "Up/Down: Select  space: Pause/Resume  d: Delete  n: New  1-4: Presets",
            "s: Settings  ?: Help  q: Quit",
        ),
        AppView::Settings => (
            "Up/Down: Row  Left/Right: Adjust",
            "esc: Back  ?: Help  q: Quit",
        ),
        AppView::Help => ("", "esc: Back  q: Quit"),
    };
    let mut lines = Vec::new();
    if !primary.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {primary}"),
            Style::default().fg(palette.dim),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("  {secondary}"),
        Style::default().fg(palette.dim),
    )));
    lines
}

fn footer_line<'a>(app: &'a App, palette: &Palette, now: DateTime<Utc>) -> Line<'a> {
    if let Some(status) = &app.status {
        return Line::from(Span::styled(
            status.as_str(),
            Style::default()
                .fg(palette.warn)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if let Some((timer, remaining)) = app.next_due(now) {
        let index = (Local::now().timestamp() % SPINNER.len() as i64) as usize;
        return Line::from(vec![
            Span::styled(
                format!("{} ", SPINNER[index]),
                Style::default()
                    .fg(palette.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} in ", timer.display_label()),
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format_remaining(remaining),
                Style::default()
                    .fg(palette.active)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
    }

    let count = app.store.timers().len();
    if count == 0 {
        Line::from(Span::styled(
            "● No timers",
            Style::default().fg(palette.dim),
        ))
    } else {
        let label = if count == 1 { "timer" } else { "timers" };
        Line::from(Span::styled(
            format!("● {count} {label}, none running"),
            Style::default().fg(palette.dim),
        ))
    }
}

/// Paint the live bursts straight into the frame buffer, over the card
/// each one belongs to. Pieces rise from the card's bottom edge and
/// dim over the last stretch of their flight.
fn render_confetti(frame: &mut Frame, app: &App, cards: &[(TimerId, Rect)], now: DateTime<Utc>) {
    if app.bursts.is_empty() {
        return;
    }
    let buffer = frame.buffer_mut();
    for burst in &app.bursts {
        let Some((_, card)) = cards.iter().find(|(id, _)| *id == burst.timer_id) else {
            continue;
        };
        let inner = Rect {
            x: card.x + 1,
            y: card.y + 1,
            width: card.width.saturating_sub(2),
            height: card.height.saturating_sub(2),
        };
        if inner.width == 0 || inner.height == 0 {
            continue;
        }
        let elapsed = burst.elapsed_ms(now);
        for (piece, flight) in burst.airborne(elapsed) {
            let x = inner.x + (piece.x * (inner.width - 1) as f64).round() as u16;
            let rise = (flight * (inner.height - 1) as f64).round() as u16;
            let y = inner.y + inner.height - 1 - rise;
            let mut style = Style::default().fg(piece.color);
            if flight > 0.7 {
                style = style.add_modifier(Modifier::DIM);
            }
            buffer.set_string(x, y, piece.glyph.to_string(), style);
        }
    }
}

fn render_new_timer_popup(frame: &mut Frame, popup: &NewTimerPopup, palette: &Palette) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let label_active = popup.field == NewTimerField::Label;
    let target_active = popup.field == NewTimerField::Target;
    let theme_active = popup.field == NewTimerField::Theme;

    let arrow_style = Style::default()
        .fg(palette.marker)
        .add_modifier(Modifier::BOLD);
    let active_title = Style::default()
        .fg(palette.highlight)
        .add_modifier(Modifier::BOLD);
    let idle_title = Style::default().fg(palette.dim);

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        "New timer",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let mut label_line = vec![
        Span::styled(if label_active { "> " } else { "  " }, arrow_style),
        Span::styled("Label:  ", if label_active { active_title } else { idle_title }),
        Span::styled(popup.label.as_str(), Style::default().fg(palette.text)),
    ];
    if label_active {
        label_line.push(Span::styled("_", active_title));
    }
    lines.push(Line::from(label_line));
    lines.push(Line::from(""));

    let mut target_line = vec![
        Span::styled(if target_active { "> " } else { "  " }, arrow_style),
        Span::styled(
            "Target: ",
            if target_active { active_title } else { idle_title },
        ),
        Span::styled(popup.target.as_str(), Style::default().fg(palette.text)),
    ];
    if target_active {
        target_line.push(Span::styled("_", active_title));
    }
    lines.push(Line::from(target_line));
    lines.push(Line::from(Span::styled(
        "          local time, YYYY-MM-DD HH:MM",
        Style::default().fg(palette.dim),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled(if theme_active { "> " } else { "  " }, arrow_style),
        Span::styled("Theme", if theme_active { active_title } else { idle_title }),
    ]));
    for index in 0..=TimerTheme::ALL.len() {
        let selected = index == popup.theme_index;
        let marker_style = if selected {
            arrow_style
        } else {
            Style::default().fg(palette.dim)
        };
        let (name, mut name_style) = match index.checked_sub(1) {
            Some(theme_index) => {
                let theme = TimerTheme::ALL[theme_index];
                let (border, _) = timer_colors(theme);
                (theme.label(), Style::default().fg(border))
            }
            None => ("Random", Style::default().fg(palette.text)),
        };
        if selected {
            name_style = name_style.add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(vec![
            Span::styled(if selected { "  > " } else { "    " }, marker_style),
            Span::styled(name, name_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Type to edit. Tab: switch field. Up/Down: theme. Enter: start. Esc: cancel.",
        Style::default().fg(palette.dim),
    )));

    let popup_widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(palette.secondary))
                .title(" New Timer "),
        );
    frame.render_widget(popup_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
