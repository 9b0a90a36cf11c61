use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    prelude::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};

use super::SPINNER;
use super::helpers::{clamp_name, format_due};
use super::theme::{Palette, timer_colors};
use crate::app::App;
use crate::countdown::{Countdown, Phase, format_remaining};
use crate::types::{PRESETS, Timer, TimerId};

/// Card height including its border rows.
pub const CARD_HEIGHT: u16 = 5;

/// Render the card list and report where each card landed so confetti
/// can be painted over the right one.
pub fn render_board(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    palette: &Palette,
    now: DateTime<Utc>,
) -> Vec<(TimerId, Rect)> {
    let timers = app.store.timers();
    if timers.is_empty() {
        render_empty_board(frame, area, palette);
        return Vec::new();
    }

    // Window the list so the selected card is always on screen.
    let visible = (area.height / CARD_HEIGHT).max(1) as usize;
    let first = if app.selected_index < visible {
        0
    } else {
        app.selected_index + 1 - visible
    };

    let mut cards = Vec::new();
    for (offset, (index, timer)) in timers
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .enumerate()
    {
        let card_area = Rect {
            x: area.x,
            y: area.y + offset as u16 * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT,
        };
        if card_area.bottom() > area.bottom() {
            break;
        }
        render_card(
            frame,
            card_area,
            palette,
            timer,
            app.countdown(timer.id),
            index == app.selected_index,
            now,
        );
        cards.push((timer.id, card_area));
    }
    cards
}

fn render_empty_board(frame: &mut Frame, area: Rect, palette: &Palette) {
    let mut preset_spans = vec![Span::styled(
        "  presets  ",
        Style::default().fg(palette.dim),
    )];
    for (index, preset) in PRESETS.iter().enumerate() {
        preset_spans.push(Span::styled(
            format!("{}", index + 1),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
        preset_spans.push(Span::styled(
            format!(": {}  ", preset.label),
            Style::default().fg(palette.text),
        ));
    }
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No timers yet. Press 'n' to add one, or use a quick preset.",
            Style::default().fg(palette.dim),
        )),
        Line::from(""),
        Line::from(preset_spans),
    ];
    let empty = Paragraph::new(lines).alignment(Alignment::Left);
    frame.render_widget(empty, area);
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    palette: &Palette,
    timer: &Timer,
    countdown: Option<&Countdown>,
    selected: bool,
    now: DateTime<Utc>,
) {
    let (border, gauge_color) = timer_colors(timer.theme);
    let border_style = if selected {
        Style::default().fg(border).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(border)
    };
    let mut title_spans = Vec::new();
    if selected {
        title_spans.push(Span::styled(
            " > ",
            Style::default()
                .fg(palette.marker)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        title_spans.push(Span::raw(" "));
    }
    title_spans.push(Span::styled(
        format!("{} ", clamp_name(timer.display_label(), 32)),
        Style::default().fg(border).add_modifier(Modifier::BOLD),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Line::from(title_spans));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let Some(countdown) = countdown else {
        return;
    };

    let remaining_line = countdown_line(countdown, palette, now);
    let row = |offset: u16| Rect {
        y: inner.y + offset,
        height: 1,
        ..inner
    };
    frame.render_widget(Paragraph::new(remaining_line), row(0));

    if inner.height >= 2 {
        let due_line = Line::from(vec![
            Span::styled("due ", Style::default().fg(palette.dim)),
            Span::styled(format_due(timer.target_time), Style::default().fg(palette.dim)),
            Span::styled(
                format!("  ·  {}", timer.theme.label().to_lowercase()),
                Style::default().fg(palette.dim),
            ),
        ]);
        frame.render_widget(Paragraph::new(due_line), row(1));
    }

    if inner.height >= 3 {
        let progress = countdown.progress(now);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(if countdown.is_finished() {
                palette.success
            } else {
                gauge_color
            }))
            .ratio(progress)
            .label(format!("{:>3.0}%", progress * 100.0));
        frame.render_widget(gauge, row(2));
    }
}

fn countdown_line(countdown: &Countdown, palette: &Palette, now: DateTime<Utc>) -> Line<'static> {
    let remaining = format_remaining(countdown.remaining(now));
    match countdown.phase() {
        Phase::Running => {
            let index = (Local::now().timestamp() % SPINNER.len() as i64) as usize;
            Line::from(vec![
                Span::styled(
                    format!("{} ", SPINNER[index]),
                    Style::default()
                        .fg(palette.active)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    remaining,
                    Style::default()
                        .fg(palette.text)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        }
        Phase::Paused => Line::from(vec![
            Span::styled(
                "|| ",
                Style::default()
                    .fg(palette.warn)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(remaining, Style::default().fg(palette.warn)),
            Span::styled(" paused", Style::default().fg(palette.dim)),
        ]),
        Phase::Finished => Line::from(Span::styled(
            remaining,
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        )),
    }
}
