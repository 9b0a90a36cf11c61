//! Persisted state: the timer list and preferences as one JSON
//! snapshot, rewritten in full on every mutation.

use std::{env, fs, path::PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::types::{
    AppTheme, Preferences, SoundPack, ThemeChoice, Timer, TimerId, TimerTheme, sound_pack,
};

/// Shape of the snapshot document on disk.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    app_theme: &'a str,
    sound_id: &'a str,
    volume: f32,
    timers: Vec<SnapshotTimer<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotTimer<'a> {
    id: TimerId,
    label: &'a str,
    theme: &'a str,
    target_time: String,
}

pub struct TimerStore {
    path: PathBuf,
    prefs: Preferences,
    timers: Vec<Timer>,
}

impl TimerStore {
    /// Open the snapshot at `path`. A missing or unreadable snapshot
    /// starts the app empty with default preferences, never an error.
    pub fn open(path: PathBuf) -> Self {
        let (prefs, timers) = match fs::read_to_string(&path) {
            Ok(content) => parse_snapshot(&content),
            Err(_) => (Preferences::default(), Vec::new()),
        };
        Self {
            path,
            prefs,
            timers,
        }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    /// All timers, newest first.
    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn timer(&self, id: TimerId) -> Option<&Timer> {
        self.timers.iter().find(|timer| timer.id == id)
    }

    /// Create a timer at the top of the list and persist. The timer is
    /// kept in memory even when writing the snapshot fails.
    pub fn add(
        &mut self,
        target_time: DateTime<Utc>,
        label: &str,
        choice: ThemeChoice,
        now: DateTime<Utc>,
    ) -> Result<TimerId> {
        let mut id = now.timestamp_millis() as TimerId;
        while self.timers.iter().any(|timer| timer.id == id) {
            id += 1;
        }
        self.timers.insert(
            0,
            Timer {
                id,
                label: label.trim().to_string(),
                theme: choice.resolve(),
                target_time,
            },
        );
        self.save()?;
        Ok(id)
    }

    /// Remove a timer by id. Removing an id that is not there is quiet.
    pub fn remove(&mut self, id: TimerId) -> Result<()> {
        self.timers.retain(|timer| timer.id != id);
        self.save()
    }

    pub fn set_app_theme(&mut self, theme: AppTheme) -> Result<()> {
        self.prefs.app_theme = theme;
        self.save()
    }

    pub fn set_sound(&mut self, pack: &'static SoundPack) -> Result<()> {
        self.prefs.sound = pack;
        self.save()
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.prefs.volume = volume.clamp(0.0, 1.0);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let snapshot = Snapshot {
            app_theme: self.prefs.app_theme.id(),
            sound_id: self.prefs.sound.id,
            volume: self.prefs.volume,
            timers: self
                .timers
                .iter()
                .map(|timer| SnapshotTimer {
                    id: timer.id,
                    label: &timer.label,
                    theme: timer.theme.id(),
                    target_time: timer.target_time.to_rfc3339(),
                })
                .collect(),
        };
        let payload = serde_json::to_vec_pretty(&snapshot)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// Read a snapshot document leniently: unknown fields are ignored,
/// each preference is validity-checked against its enumerated set, and
/// a malformed timer entry drops that entry alone.
fn parse_snapshot(content: &str) -> (Preferences, Vec<Timer>) {
    let Ok(root) = serde_json::from_str::<Value>(content) else {
        return (Preferences::default(), Vec::new());
    };
    let mut prefs = Preferences::default();
    if let Some(theme) = root
        .get("appTheme")
        .and_then(Value::as_str)
        .and_then(AppTheme::parse)
    {
        prefs.app_theme = theme;
    }
    if let Some(id) = root.get("soundId").and_then(Value::as_str) {
        prefs.sound = sound_pack(id);
    }
    if let Some(volume) = root.get("volume").and_then(Value::as_f64) {
        if (0.0..=1.0).contains(&volume) {
            prefs.volume = volume as f32;
        }
    }
    let timers = root
        .get("timers")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_timer).collect())
        .unwrap_or_default();
    (prefs, timers)
}

/// `id` and a parseable `targetTime` are required; anything else
/// missing or unrecognized falls back rather than dropping the entry.
fn parse_timer(entry: &Value) -> Option<Timer> {
    let id = entry.get("id").and_then(Value::as_u64)?;
    let target = entry.get("targetTime").and_then(Value::as_str)?;
    let target_time = DateTime::parse_from_rfc3339(target).ok()?.with_timezone(&Utc);
    let label = entry
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let theme = entry
        .get("theme")
        .and_then(Value::as_str)
        .and_then(TimerTheme::parse)
        .unwrap_or_default();
    Some(Timer {
        id,
        label,
        theme,
        target_time,
    })
}

/// Snapshot location: `DOWNTICK_STATE` when set, otherwise
/// `downtick/state.json` under the user's data directory, with a
/// flat-file fallback when no data directory exists.
pub fn default_state_path() -> PathBuf {
    if let Ok(path) = env::var("DOWNTICK_STATE") {
        return PathBuf::from(path);
    }
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("downtick").join("state.json")
    } else {
        PathBuf::from("downtick.json")
    }
}
