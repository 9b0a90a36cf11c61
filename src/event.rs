use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use crate::app::{App, AppEvent};

/// Cadence at which countdowns are re-evaluated and the board redrawn.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Polls for a key press within `timeout`, ignoring releases and repeats.
pub fn poll(timeout: Duration) -> Result<Option<AppEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(AppEvent::KeyPress(key.code)));
            }
        }
    }
    Ok(None)
}

/// Runs the main event loop until the app asks to quit.
///
/// Key presses are forwarded as they arrive. `Tick` fires on a steady
/// cadence even while input streams in, so a held key cannot stall a
/// countdown past its target.
pub fn run(app: &mut App, terminal: &mut crate::tui::Terminal) -> Result<()> {
    let mut last_tick = Instant::now();

    while app.running {
        terminal.draw(|frame| crate::ui::draw(frame, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if let Some(event) = poll(timeout)? {
            app.update(event);
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.update(AppEvent::Tick);
            last_tick = Instant::now();
        }
    }
    Ok(())
}
