//! Command line front end: manage timers without entering the TUI.

use anyhow::Result;
use chrono::{Local, TimeDelta, Utc};
use clap::{Parser, Subcommand};

use crate::countdown::format_remaining;
use crate::store::TimerStore;
use crate::types::{TARGET_TIME_FORMAT, ThemeChoice, TimerId, TimerTheme, parse_target_time};

#[derive(Parser)]
#[command(
    name = "downtick",
    version,
    about = "Downtick - countdown timers for the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Add {
        when: Option<String>,
        #[arg(short, long)]
        mins: Option<i64>,
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long)]
        theme: Option<String>,
    },
    List,
    Remove {
        id: TimerId,
    },
}

/// Execute a CLI command against the snapshot store.
pub fn run(command: Command, store: &mut TimerStore) -> Result<()> {
    match command {
        Command::Add {
            when,
            mins,
            label,
            theme,
        } => handle_add(when, mins, label, theme, store)?,
        Command::List => handle_list(store),
        Command::Remove { id } => handle_remove(id, store)?,
    }
    Ok(())
}

fn handle_add(
    when: Option<String>,
    mins: Option<i64>,
    label: Option<String>,
    theme: Option<String>,
    store: &mut TimerStore,
) -> Result<()> {
    let now = Utc::now();
    let target_time = match (when, mins) {
        (Some(_), Some(_)) => {
            println!("Give either a target time or --mins, not both.");
            return Ok(());
        }
        (Some(when), None) => match parse_target_time(&when) {
            Some(target) => target,
            None => {
                println!("Please select a valid date & time.");
                return Ok(());
            }
        },
        (None, Some(mins)) if mins > 0 => now + TimeDelta::minutes(mins),
        (None, Some(_)) => {
            println!("--mins must be a positive number of minutes.");
            return Ok(());
        }
        (None, None) => {
            println!("Give a target time (\"YYYY-MM-DD HH:MM\") or --mins.");
            return Ok(());
        }
    };

    let choice = match theme.as_deref() {
        None | Some("random") => ThemeChoice::Random,
        Some(name) => match TimerTheme::parse(name) {
            Some(theme) => ThemeChoice::Fixed(theme),
            None => {
                let themes = TimerTheme::ALL
                    .iter()
                    .map(|theme| theme.id())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("Unknown theme '{name}'. Available: random, {themes}.");
                return Ok(());
            }
        },
    };

    let id = store.add(target_time, label.as_deref().unwrap_or(""), choice, now)?;
    if let Some(timer) = store.timer(id) {
        let due = timer
            .target_time
            .with_timezone(&Local)
            .format(TARGET_TIME_FORMAT);
        println!("Added timer {id}: {} (due {due})", timer.display_label());
    }
    Ok(())
}

fn handle_list(store: &TimerStore) {
    if store.timers().is_empty() {
        println!("No timers.");
        return;
    }
    let now = Utc::now();
    for timer in store.timers() {
        let remaining = format_remaining(timer.target_time - now);
        let due = timer
            .target_time
            .with_timezone(&Local)
            .format(TARGET_TIME_FORMAT);
        println!(
            "{}  {}  ({remaining}, due {due})",
            timer.id,
            timer.display_label()
        );
    }
}

fn handle_remove(id: TimerId, store: &mut TimerStore) -> Result<()> {
    if store.timer(id).is_none() {
        println!("No timer with id {id}.");
        return Ok(());
    }
    store.remove(id)?;
    println!("Removed timer {id}.");
    Ok(())
}
