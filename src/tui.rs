use std::io;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::CrosstermBackend;

/// Terminal type shared by the event loop and the renderer.
pub type Terminal = ratatui::Terminal<CrosstermBackend<io::Stdout>>;

/// Puts the terminal into raw mode on the alternate screen.
pub fn init() -> Result<Terminal> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    Ok(ratatui::Terminal::new(backend)?)
}

/// Hands the terminal back to the shell.
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
