mod app;
mod cli;
mod confetti;
mod countdown;
mod event;
mod sound;
mod store;
mod tui;
mod types;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let mut store = store::TimerStore::open(store::default_state_path());
    if let Some(command) = cli_opts.command {
        return cli::run(command, &mut store);
    }

    let mut app = app::App::new(store, sound::SoundPlayer::new());
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
