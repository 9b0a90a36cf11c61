mod state;

use crossterm::event::KeyCode;

pub use state::{App, NewTimerField, NewTimerPopup};

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Board,
    Settings,
    Help,
}

/// Rows of the settings view, adjusted with Left/Right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsRow {
    AppTheme,
    SoundPack,
    Volume,
}
