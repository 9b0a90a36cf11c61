use std::collections::HashMap;

use chrono::{DateTime, Local, TimeDelta, Utc};
use crossterm::event::KeyCode;

use crate::confetti::ConfettiBurst;
use crate::countdown::{Countdown, Phase};
use crate::sound::SoundPlayer;
use crate::store::TimerStore;
use crate::types::{
    AppTheme, PRESETS, SOUND_PACKS, TARGET_TIME_FORMAT, ThemeChoice, Timer, TimerId, TimerTheme,
    parse_target_time,
};

use super::{AppEvent, AppView, SettingsRow};

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub store: TimerStore,
    /// One live countdown per stored timer, keyed by id. An entry is
    /// created when a timer appears and removed when it is deleted, so
    /// nothing can keep ticking for a card that is gone.
    pub countdowns: HashMap<TimerId, Countdown>,
    pub bursts: Vec<ConfettiBurst>,
    pub sound: SoundPlayer,
    pub view: AppView,
    view_history: Vec<AppView>,
    pub selected_index: usize,
    pub settings_row: SettingsRow,
    pub status: Option<String>,
    pub new_timer_popup: Option<NewTimerPopup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewTimerField {
    Label,
    Target,
    Theme,
}

#[derive(Clone, Debug)]
pub struct NewTimerPopup {
    pub label: String,
    pub target: String,
    /// 0 is "pick at random", then `TimerTheme::ALL` shifted by one.
    pub theme_index: usize,
    pub field: NewTimerField,
}

impl NewTimerPopup {
    fn theme_choice(&self) -> ThemeChoice {
        match self.theme_index.checked_sub(1) {
            Some(index) => ThemeChoice::Fixed(TimerTheme::ALL[index]),
            None => ThemeChoice::Random,
        }
    }

    fn select_prev_theme(&mut self) {
        let options = TimerTheme::ALL.len() + 1;
        if self.theme_index == 0 {
            self.theme_index = options - 1;
        } else {
            self.theme_index -= 1;
        }
    }

    fn select_next_theme(&mut self) {
        let options = TimerTheme::ALL.len() + 1;
        self.theme_index = (self.theme_index + 1) % options;
    }
}

impl App {
    pub fn new(store: TimerStore, sound: SoundPlayer) -> Self {
        let now = Utc::now();
        let countdowns = store
            .timers()
            .iter()
            .map(|timer| (timer.id, Countdown::new(timer.target_time, now)))
            .collect();
        Self {
            running: true,
            store,
            countdowns,
            bursts: Vec::new(),
            sound,
            view: AppView::Board,
            view_history: Vec::new(),
            selected_index: 0,
            settings_row: SettingsRow::AppTheme,
            status: None,
            new_timer_popup: None,
        }
    }

    /// Single entry point for events from the loop.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.advance(Utc::now()),
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    /// Tick every countdown. A countdown crossing its deadline fires
    /// the completion effects once: play the preferred sound and spawn
    /// a confetti burst over its card. Spent bursts are dropped here
    /// too.
    fn advance(&mut self, now: DateTime<Utc>) {
        let mut completed = Vec::new();
        for timer in self.store.timers() {
            if let Some(countdown) = self.countdowns.get_mut(&timer.id) {
                if countdown.tick(now) {
                    completed.push(timer.id);
                }
            }
        }
        for id in completed {
            let prefs = self.store.prefs();
            self.sound.play(prefs.sound, prefs.volume);
            self.bursts.push(ConfettiBurst::spawn(id, now));
        }
        self.bursts.retain(|burst| !burst.expired(now));
    }

    pub fn countdown(&self, id: TimerId) -> Option<&Countdown> {
        self.countdowns.get(&id)
    }

    /// The running timer closest to its deadline, for the footer.
    pub fn next_due(&self, now: DateTime<Utc>) -> Option<(&Timer, TimeDelta)> {
        self.store
            .timers()
            .iter()
            .filter_map(|timer| {
                let countdown = self.countdowns.get(&timer.id)?;
                if countdown.phase() == Phase::Running {
                    Some((timer, countdown.remaining(now)))
                } else {
                    None
                }
            })
            .min_by_key(|(_, remaining)| *remaining)
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.new_timer_popup.is_some() {
            self.handle_popup_key(key);
            return;
        }
        match self.view {
            AppView::Board => self.handle_board_key(key),
            AppView::Settings => self.handle_settings_key(key),
            AppView::Help => self.handle_help_key(key),
        }
    }

    fn handle_board_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.navigate_to(AppView::Help),
            KeyCode::Char('s') => self.navigate_to(AppView::Settings),
            KeyCode::Char('n') => self.open_new_timer_popup(),
            KeyCode::Char(ch @ '1'..='4') => self.add_preset(ch as usize - '1' as usize),
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down => self.move_selection_down(),
            KeyCode::Char(' ') => self.toggle_selected(Utc::now()),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.navigate_to(AppView::Help),
            KeyCode::Esc => self.go_back(),
            KeyCode::Up => self.settings_row_up(),
            KeyCode::Down => self.settings_row_down(),
            KeyCode::Left => self.adjust_setting(-1),
            KeyCode::Right => self.adjust_setting(1),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Esc | KeyCode::Char('?') => self.go_back(),
            _ => {}
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if self.view != view {
            self.view_history.push(self.view);
            self.view = view;
        }
    }

    fn go_back(&mut self) {
        if let Some(view) = self.view_history.pop() {
            self.view = view;
        }
        self.clear_status();
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    // ── Board actions ────────────────────────────────────────────────

    fn move_selection_up(&mut self) {
        let len = self.store.timers().len();
        if len == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    fn move_selection_down(&mut self) {
        let len = self.store.timers().len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    fn selected_timer_id(&self) -> Option<TimerId> {
        self.store
            .timers()
            .get(self.selected_index)
            .map(|timer| timer.id)
    }

    /// Space on a card: pause a running countdown, resume a paused
    /// one. Finished cards ignore it.
    fn toggle_selected(&mut self, now: DateTime<Utc>) {
        let Some(id) = self.selected_timer_id() else {
            return;
        };
        if let Some(countdown) = self.countdowns.get_mut(&id) {
            match countdown.phase() {
                Phase::Running => countdown.pause(now),
                Phase::Paused => countdown.resume(now),
                Phase::Finished => {}
            }
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_timer_id() else {
            self.status = Some("No timer selected.".to_string());
            return;
        };
        self.remove_timer(id);
    }

    /// Remove a timer along with its countdown and any confetti still
    /// falling over its card.
    fn remove_timer(&mut self, id: TimerId) {
        match self.store.remove(id) {
            Ok(()) => self.status = Some("Timer deleted.".to_string()),
            Err(err) => self.status = Some(format!("Failed to save timers: {err}")),
        }
        self.countdowns.remove(&id);
        self.bursts.retain(|burst| burst.timer_id != id);
        if self.selected_index >= self.store.timers().len() {
            self.selected_index = self.store.timers().len().saturating_sub(1);
        }
    }

    fn add_timer(&mut self, target: DateTime<Utc>, label: &str, choice: ThemeChoice) {
        let now = Utc::now();
        let result = self.store.add(target, label, choice, now);
        // The timer is in memory even when the snapshot write failed.
        self.sync_countdowns(now);
        self.selected_index = 0;
        match result {
            Ok(_) => self.status = Some("Timer added.".to_string()),
            Err(err) => self.status = Some(format!("Failed to save timers: {err}")),
        }
    }

    fn sync_countdowns(&mut self, now: DateTime<Utc>) {
        for timer in self.store.timers() {
            self.countdowns
                .entry(timer.id)
                .or_insert_with(|| Countdown::new(timer.target_time, now));
        }
    }

    fn add_preset(&mut self, index: usize) {
        let Some(preset) = PRESETS.get(index) else {
            return;
        };
        let target = Utc::now() + TimeDelta::minutes(preset.minutes);
        self.add_timer(target, preset.label, ThemeChoice::Random);
    }

    // ── New-timer popup ──────────────────────────────────────────────

    fn open_new_timer_popup(&mut self) {
        self.new_timer_popup = Some(NewTimerPopup {
            label: String::new(),
            target: Local::now().format(TARGET_TIME_FORMAT).to_string(),
            theme_index: 0,
            field: NewTimerField::Label,
        });
    }

    fn handle_popup_key(&mut self, key: KeyCode) {
        let Some(popup) = self.new_timer_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.new_timer_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => self.apply_new_timer_popup(),
            KeyCode::Tab => {
                popup.field = match popup.field {
                    NewTimerField::Label => NewTimerField::Target,
                    NewTimerField::Target => NewTimerField::Theme,
                    NewTimerField::Theme => NewTimerField::Label,
                };
            }
            KeyCode::Up => {
                if popup.field == NewTimerField::Theme {
                    popup.select_prev_theme();
                }
            }
            KeyCode::Down => {
                if popup.field == NewTimerField::Theme {
                    popup.select_next_theme();
                }
            }
            KeyCode::Backspace | KeyCode::Delete => match popup.field {
                NewTimerField::Label => {
                    popup.label.pop();
                }
                NewTimerField::Target => {
                    popup.target.pop();
                }
                NewTimerField::Theme => {}
            },
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                match popup.field {
                    NewTimerField::Label => popup.label.push(ch),
                    NewTimerField::Target => popup.target.push(ch),
                    NewTimerField::Theme => {}
                }
            }
            _ => {}
        }
    }

    fn apply_new_timer_popup(&mut self) {
        let Some(popup) = self.new_timer_popup.take() else {
            return;
        };
        let Some(target) = parse_target_time(&popup.target) else {
            self.status = Some("Please select a valid date & time.".to_string());
            self.new_timer_popup = Some(popup);
            return;
        };
        self.add_timer(target, &popup.label, popup.theme_choice());
    }

    // ── Settings ─────────────────────────────────────────────────────

    fn settings_row_up(&mut self) {
        self.settings_row = match self.settings_row {
            SettingsRow::AppTheme => SettingsRow::Volume,
            SettingsRow::SoundPack => SettingsRow::AppTheme,
            SettingsRow::Volume => SettingsRow::SoundPack,
        };
    }

    fn settings_row_down(&mut self) {
        self.settings_row = match self.settings_row {
            SettingsRow::AppTheme => SettingsRow::SoundPack,
            SettingsRow::SoundPack => SettingsRow::Volume,
            SettingsRow::Volume => SettingsRow::AppTheme,
        };
    }

    fn adjust_setting(&mut self, delta: i32) {
        let result = match self.settings_row {
            SettingsRow::AppTheme => {
                let current = self.store.prefs().app_theme;
                let index = AppTheme::ALL
                    .iter()
                    .position(|theme| *theme == current)
                    .unwrap_or(0);
                let next = wrap_index(index, delta, AppTheme::ALL.len());
                self.store.set_app_theme(AppTheme::ALL[next])
            }
            SettingsRow::SoundPack => {
                let current = self.store.prefs().sound.id;
                let index = SOUND_PACKS
                    .iter()
                    .position(|pack| pack.id == current)
                    .unwrap_or(0);
                let next = wrap_index(index, delta, SOUND_PACKS.len());
                let pack = &SOUND_PACKS[next];
                let result = self.store.set_sound(pack);
                // Preview the new pack at the current volume.
                self.sound.play(pack, self.store.prefs().volume);
                result
            }
            SettingsRow::Volume => {
                let volume = self.store.prefs().volume + delta as f32 * 0.01;
                self.store.set_volume(volume)
            }
        };
        if let Err(err) = result {
            self.status = Some(format!("Failed to save settings: {err}"));
        }
    }
}

fn wrap_index(index: usize, delta: i32, len: usize) -> usize {
    (index as i32 + delta).rem_euclid(len as i32) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::Phase;
    use crate::types::UNTITLED_LABEL;

    fn test_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = TimerStore::open(dir.path().join("state.json"));
        (dir, App::new(store, SoundPlayer::disabled()))
    }

    fn key(app: &mut App, code: KeyCode) {
        app.update(AppEvent::KeyPress(code));
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let (_dir, mut app) = test_app();
        key(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn preset_key_adds_timer_on_top() {
        let (_dir, mut app) = test_app();
        key(&mut app, KeyCode::Char('1'));
        key(&mut app, KeyCode::Char('3'));
        let timers = app.store.timers();
        assert_eq!(timers.len(), 2);
        assert_eq!(timers[0].label, "Power Nap 30m");
        assert_eq!(timers[1].label, "5 min");
        assert_eq!(app.selected_index, 0);
        assert!(app.countdowns.contains_key(&timers[0].id));
        assert!(app.countdowns.contains_key(&timers[1].id));
    }

    #[test]
    fn popup_round_trip_creates_timer() {
        let (_dir, mut app) = test_app();
        key(&mut app, KeyCode::Char('n'));
        assert!(app.new_timer_popup.is_some());
        for ch in "tea break".chars() {
            key(&mut app, KeyCode::Char(ch));
        }
        // Target field is pre-filled with the current time; pick a
        // fixed theme and submit.
        key(&mut app, KeyCode::Tab);
        key(&mut app, KeyCode::Tab);
        key(&mut app, KeyCode::Down);
        key(&mut app, KeyCode::Enter);
        assert!(app.new_timer_popup.is_none());
        let timers = app.store.timers();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].label, "tea break");
        assert_eq!(timers[0].theme, TimerTheme::Sunset);
        assert_eq!(app.status.as_deref(), Some("Timer added."));
    }

    #[test]
    fn popup_rejects_invalid_target_and_stays_open() {
        let (_dir, mut app) = test_app();
        key(&mut app, KeyCode::Char('n'));
        app.new_timer_popup.as_mut().unwrap().target = "soonish".to_string();
        key(&mut app, KeyCode::Enter);
        assert!(app.new_timer_popup.is_some());
        assert_eq!(
            app.status.as_deref(),
            Some("Please select a valid date & time.")
        );
        assert!(app.store.timers().is_empty());
    }

    #[test]
    fn popup_escape_discards_input() {
        let (_dir, mut app) = test_app();
        key(&mut app, KeyCode::Char('n'));
        key(&mut app, KeyCode::Char('x'));
        key(&mut app, KeyCode::Esc);
        assert!(app.new_timer_popup.is_none());
        assert!(app.store.timers().is_empty());
    }

    #[test]
    fn completion_fires_effects_exactly_once() {
        let (_dir, mut app) = test_app();
        let now = Utc::now();
        app.add_timer(now + TimeDelta::seconds(5), "egg", ThemeChoice::Random);
        let id = app.store.timers()[0].id;

        app.advance(now + TimeDelta::seconds(2));
        assert!(app.bursts.is_empty());

        app.advance(now + TimeDelta::seconds(6));
        assert_eq!(app.bursts.len(), 1);
        assert_eq!(app.bursts[0].timer_id, id);
        assert!(app.countdown(id).unwrap().is_finished());

        // Later ticks must not spawn another burst.
        app.advance(now + TimeDelta::seconds(7));
        assert_eq!(app.bursts.len(), 1);

        // And the burst itself expires.
        app.advance(now + TimeDelta::seconds(8));
        assert!(app.bursts.is_empty());
    }

    #[test]
    fn space_toggles_pause_and_resume() {
        let (_dir, mut app) = test_app();
        let now = Utc::now();
        app.add_timer(now + TimeDelta::minutes(30), "", ThemeChoice::Random);
        let id = app.store.timers()[0].id;
        assert_eq!(app.store.timers()[0].display_label(), UNTITLED_LABEL);

        app.toggle_selected(now);
        assert_eq!(app.countdown(id).unwrap().phase(), Phase::Paused);
        let frozen = app.countdown(id).unwrap().remaining(now);

        // Ten minutes later the frozen span resumes unchanged.
        let later = now + TimeDelta::minutes(10);
        app.toggle_selected(later);
        assert_eq!(app.countdown(id).unwrap().phase(), Phase::Running);
        assert_eq!(app.countdown(id).unwrap().remaining(later), frozen);
    }

    #[test]
    fn paused_timer_never_completes() {
        let (_dir, mut app) = test_app();
        let now = Utc::now();
        app.add_timer(now + TimeDelta::seconds(5), "", ThemeChoice::Random);
        app.toggle_selected(now);
        app.advance(now + TimeDelta::minutes(10));
        assert!(app.bursts.is_empty());
        let id = app.store.timers()[0].id;
        assert_eq!(app.countdown(id).unwrap().phase(), Phase::Paused);
    }

    #[test]
    fn delete_drops_countdown_and_confetti() {
        let (_dir, mut app) = test_app();
        let now = Utc::now();
        app.add_timer(now - TimeDelta::seconds(1), "done", ThemeChoice::Random);
        let id = app.store.timers()[0].id;
        app.advance(now);
        assert_eq!(app.bursts.len(), 1);

        app.delete_selected();
        assert!(app.store.timers().is_empty());
        assert!(app.countdowns.is_empty());
        assert!(app.bursts.is_empty());
        assert_eq!(app.status.as_deref(), Some("Timer deleted."));
        assert!(app.countdown(id).is_none());
    }

    #[test]
    fn delete_clamps_selection_to_last_card() {
        let (_dir, mut app) = test_app();
        let now = Utc::now();
        for label in ["a", "b", "c"] {
            app.add_timer(now + TimeDelta::minutes(5), label, ThemeChoice::Random);
        }
        app.selected_index = 2;
        app.delete_selected();
        assert_eq!(app.store.timers().len(), 2);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn delete_on_empty_board_reports_status() {
        let (_dir, mut app) = test_app();
        key(&mut app, KeyCode::Char('d'));
        assert_eq!(app.status.as_deref(), Some("No timer selected."));
    }

    #[test]
    fn selection_wraps_both_ways() {
        let (_dir, mut app) = test_app();
        let now = Utc::now();
        for label in ["a", "b", "c"] {
            app.add_timer(now + TimeDelta::minutes(5), label, ThemeChoice::Random);
        }
        assert_eq!(app.selected_index, 0);
        key(&mut app, KeyCode::Up);
        assert_eq!(app.selected_index, 2);
        key(&mut app, KeyCode::Down);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn settings_cycle_app_theme_and_sound() {
        let (_dir, mut app) = test_app();
        key(&mut app, KeyCode::Char('s'));
        assert_eq!(app.view, AppView::Settings);

        key(&mut app, KeyCode::Right);
        assert_eq!(app.store.prefs().app_theme, AppTheme::Dark);
        key(&mut app, KeyCode::Left);
        key(&mut app, KeyCode::Left);
        assert_eq!(app.store.prefs().app_theme, AppTheme::Forest);

        key(&mut app, KeyCode::Down);
        key(&mut app, KeyCode::Right);
        assert_eq!(app.store.prefs().sound.id, "chime");
        key(&mut app, KeyCode::Left);
        key(&mut app, KeyCode::Left);
        assert_eq!(app.store.prefs().sound.id, "sparkle");
    }

    #[test]
    fn volume_steps_by_hundredth_and_clamps() {
        let (_dir, mut app) = test_app();
        app.view = AppView::Settings;
        app.settings_row = SettingsRow::Volume;
        key(&mut app, KeyCode::Right);
        let volume = app.store.prefs().volume;
        assert!((volume - 0.81).abs() < 1e-4);
        for _ in 0..40 {
            key(&mut app, KeyCode::Right);
        }
        assert_eq!(app.store.prefs().volume, 1.0);
        for _ in 0..200 {
            key(&mut app, KeyCode::Left);
        }
        assert_eq!(app.store.prefs().volume, 0.0);
    }

    #[test]
    fn next_due_tracks_closest_running_timer() {
        let (_dir, mut app) = test_app();
        let now = Utc::now();
        app.add_timer(now + TimeDelta::minutes(60), "slow", ThemeChoice::Random);
        app.add_timer(now + TimeDelta::minutes(30), "fast", ThemeChoice::Random);
        let (timer, _) = app.next_due(now).unwrap();
        assert_eq!(timer.label, "fast");

        // Pausing it hands the slot to the other one.
        app.selected_index = 0;
        app.toggle_selected(now);
        let (timer, _) = app.next_due(now).unwrap();
        assert_eq!(timer.label, "slow");
    }

    #[test]
    fn help_and_back_navigation() {
        let (_dir, mut app) = test_app();
        key(&mut app, KeyCode::Char('?'));
        assert_eq!(app.view, AppView::Help);
        key(&mut app, KeyCode::Char('?'));
        assert_eq!(app.view, AppView::Board);
        key(&mut app, KeyCode::Char('s'));
        key(&mut app, KeyCode::Char('?'));
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.view, AppView::Settings);
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.view, AppView::Board);
    }

    #[test]
    fn reload_restores_countdowns_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = TimerStore::open(path.clone());
        let now = Utc::now();
        store
            .add(
                now + TimeDelta::minutes(5),
                "tea",
                ThemeChoice::Fixed(TimerTheme::Ocean),
                now,
            )
            .unwrap();
        drop(store);

        let app = App::new(TimerStore::open(path), SoundPlayer::disabled());
        let id = app.store.timers()[0].id;
        assert_eq!(app.countdown(id).unwrap().phase(), Phase::Running);
    }
}
