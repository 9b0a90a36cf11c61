use ratatui::style::Color;

use crate::types::{AppTheme, TimerTheme};

/// Colors for one app theme. Derived from the preferences on every
/// frame, so switching themes in the settings repaints immediately.
pub struct Palette {
    /// Primary branding color (header badge background).
    pub primary: Color,
    /// Frame/border color.
    pub secondary: Color,
    /// Accent for headings and counts.
    pub accent: Color,
    /// Selection highlight.
    pub highlight: Color,
    /// Selection marker/arrow.
    pub marker: Color,
    /// Running/active status.
    pub active: Color,
    /// Finished status.
    pub success: Color,
    /// Paused status and status-line messages.
    pub warn: Color,
    /// Dimmed/secondary text.
    pub dim: Color,
    /// Normal text.
    pub text: Color,
}

impl Palette {
    pub fn of(theme: AppTheme) -> Self {
        let (primary, secondary, accent, highlight) = match theme {
            AppTheme::Light => (Color::Blue, Color::Cyan, Color::LightBlue, Color::Cyan),
            AppTheme::Dark => (
                Color::Magenta,
                Color::DarkGray,
                Color::LightMagenta,
                Color::Magenta,
            ),
            AppTheme::Sunset => (
                Color::Rgb(0xff, 0x8c, 0x42),
                Color::Rgb(0xff, 0x5e, 0x62),
                Color::Rgb(0xff, 0xd9, 0x3d),
                Color::LightRed,
            ),
            AppTheme::Ocean => (
                Color::Rgb(0x02, 0x83, 0xc3),
                Color::Rgb(0x2e, 0xc4, 0xe6),
                Color::Cyan,
                Color::LightCyan,
            ),
            AppTheme::Galaxy => (
                Color::Rgb(0x84, 0x5e, 0xf7),
                Color::Rgb(0xa8, 0x5c, 0xf0),
                Color::LightMagenta,
                Color::Magenta,
            ),
            AppTheme::Forest => (
                Color::Rgb(0x2f, 0x9e, 0x44),
                Color::Rgb(0x51, 0xcf, 0x66),
                Color::LightGreen,
                Color::Green,
            ),
        };
        Self {
            primary,
            secondary,
            accent,
            highlight,
            marker: Color::Green,
            active: Color::LightGreen,
            success: Color::Green,
            warn: Color::Yellow,
            dim: Color::DarkGray,
            text: Color::Reset,
        }
    }
}

/// Border and gauge colors for a card's theme.
pub fn timer_colors(theme: TimerTheme) -> (Color, Color) {
    match theme {
        TimerTheme::Sunset => (Color::Rgb(0xff, 0x8c, 0x42), Color::Rgb(0xff, 0x5e, 0x62)),
        TimerTheme::Ocean => (Color::Rgb(0x2e, 0xc4, 0xe6), Color::Rgb(0x02, 0x83, 0xc3)),
        TimerTheme::Galaxy => (Color::Rgb(0xa8, 0x5c, 0xf0), Color::Rgb(0x84, 0x5e, 0xf7)),
        TimerTheme::Forest => (Color::Rgb(0x51, 0xcf, 0x66), Color::Rgb(0x2f, 0x9e, 0x44)),
    }
}
