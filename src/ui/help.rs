use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Palette;

pub fn build_help_text(palette: &Palette) -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(section_title(palette, "Board"));
    lines.extend(section_lines(
        palette,
        &[
            "Up/Down: Move selection",
            "space: Pause/Resume the selected timer",
            "d/Del: Delete the selected timer",
            "n: New timer",
            "1-4: Quick presets (5 min, 15 min, 30 min, 1 h)",
        ],
    ));

    lines.push(Line::from(""));
    lines.push(section_title(palette, "New timer popup"));
    lines.extend(section_lines(
        palette,
        &[
            "Type to edit the active field",
            "Tab: Switch field (label, target, theme)",
            "Up/Down: Pick a theme on the theme row",
            "Enter: Start the timer",
            "Esc: Cancel",
        ],
    ));

    lines.push(Line::from(""));
    lines.push(section_title(palette, "Settings"));
    lines.extend(section_lines(
        palette,
        &[
            "Up/Down: Move between rows",
            "Left/Right: Change theme/sound, volume in 0.01 steps",
        ],
    ));

    lines.push(Line::from(""));
    lines.push(section_title(palette, "Global"));
    lines.extend(section_lines(
        palette,
        &["s: Settings", "?: Toggle help", "esc: Back", "q: Quit"],
    ));

    Text::from(lines)
}

fn section_title(palette: &Palette, title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(palette.secondary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(palette: &Palette, items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(palette.text),
            ))
        })
        .collect()
}
