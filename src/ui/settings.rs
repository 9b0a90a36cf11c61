use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Palette;
use crate::app::{App, SettingsRow};

const VOLUME_BAR_WIDTH: usize = 20;

pub fn build_settings_text<'a>(app: &'a App, palette: &Palette) -> Text<'a> {
    let prefs = app.store.prefs();
    let mut lines = vec![
        Line::from(Span::styled(
            "Preferences are saved as soon as they change.",
            Style::default().fg(palette.dim),
        )),
        Line::from(""),
    ];

    lines.push(settings_line(
        app,
        palette,
        SettingsRow::AppTheme,
        "App theme",
        format!("< {} >", prefs.app_theme.label()),
    ));
    lines.push(Line::from(""));
    lines.push(settings_line(
        app,
        palette,
        SettingsRow::SoundPack,
        "Sound",
        format!("< {} >", prefs.sound.name),
    ));
    lines.push(Line::from(""));
    lines.push(settings_line(
        app,
        palette,
        SettingsRow::Volume,
        "Volume",
        format!("{} {:.2}", volume_bar(prefs.volume), prefs.volume),
    ));

    Text::from(lines)
}

fn settings_line<'a>(
    app: &'a App,
    palette: &Palette,
    row: SettingsRow,
    name: &'static str,
    value: String,
) -> Line<'a> {
    let active = app.settings_row == row;
    let marker_style = Style::default()
        .fg(palette.marker)
        .add_modifier(Modifier::BOLD);
    let name_style = if active {
        Style::default()
            .fg(palette.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.dim)
    };
    let value_style = if active {
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.text)
    };
    Line::from(vec![
        Span::styled(if active { "> " } else { "  " }, marker_style),
        Span::styled(format!("{name:<12}"), name_style),
        Span::styled(value, value_style),
    ])
}

fn volume_bar(volume: f32) -> String {
    let filled = (volume.clamp(0.0, 1.0) * VOLUME_BAR_WIDTH as f32).round() as usize;
    let mut bar = String::from("[");
    for index in 0..VOLUME_BAR_WIDTH {
        bar.push(if index < filled { '#' } else { '·' });
    }
    bar.push(']');
    bar
}
