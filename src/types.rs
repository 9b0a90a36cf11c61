use chrono::{DateTime, Local, NaiveDateTime, Utc};
use rand::RngExt;

pub type TimerId = u64;

/// Label shown for timers saved without one.
pub const UNTITLED_LABEL: &str = "Untitled Timer";

/// Entry format for target times, local clock.
pub const TARGET_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const DEFAULT_VOLUME: f32 = 0.8;

/// A single countdown timer as it is persisted: everything except the
/// live countdown state, which is rebuilt at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    pub id: TimerId,
    pub label: String,
    pub theme: TimerTheme,
    pub target_time: DateTime<Utc>,
}

impl Timer {
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            UNTITLED_LABEL
        } else {
            &self.label
        }
    }
}

/// Per-card color theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimerTheme {
    #[default]
    Sunset,
    Ocean,
    Galaxy,
    Forest,
}

impl TimerTheme {
    pub const ALL: [TimerTheme; 4] = [
        TimerTheme::Sunset,
        TimerTheme::Ocean,
        TimerTheme::Galaxy,
        TimerTheme::Forest,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TimerTheme::Sunset => "sunset",
            TimerTheme::Ocean => "ocean",
            TimerTheme::Galaxy => "galaxy",
            TimerTheme::Forest => "forest",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerTheme::Sunset => "Sunset",
            TimerTheme::Ocean => "Ocean",
            TimerTheme::Galaxy => "Galaxy",
            TimerTheme::Forest => "Forest",
        }
    }

    pub fn parse(s: &str) -> Option<TimerTheme> {
        TimerTheme::ALL.iter().copied().find(|theme| theme.id() == s)
    }
}

/// Theme selection when creating a timer: a concrete theme, or one
/// picked at random on creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeChoice {
    Random,
    Fixed(TimerTheme),
}

impl ThemeChoice {
    /// Resolve to a concrete theme; `Random` picks uniformly.
    pub fn resolve(self) -> TimerTheme {
        match self {
            ThemeChoice::Fixed(theme) => theme,
            ThemeChoice::Random => {
                let mut rng = rand::rng();
                TimerTheme::ALL[rng.random_range(0..TimerTheme::ALL.len())]
            }
        }
    }
}

/// Whole-app color theme, cycled from the settings view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppTheme {
    #[default]
    Light,
    Dark,
    Sunset,
    Ocean,
    Galaxy,
    Forest,
}

impl AppTheme {
    pub const ALL: [AppTheme; 6] = [
        AppTheme::Light,
        AppTheme::Dark,
        AppTheme::Sunset,
        AppTheme::Ocean,
        AppTheme::Galaxy,
        AppTheme::Forest,
    ];

    pub fn id(self) -> &'static str {
        match self {
            AppTheme::Light => "light-theme",
            AppTheme::Dark => "dark-theme",
            AppTheme::Sunset => "sunset-theme",
            AppTheme::Ocean => "ocean-theme",
            AppTheme::Galaxy => "galaxy-theme",
            AppTheme::Forest => "forest-theme",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AppTheme::Light => "Light",
            AppTheme::Dark => "Dark",
            AppTheme::Sunset => "Sunset",
            AppTheme::Ocean => "Ocean",
            AppTheme::Galaxy => "Galaxy",
            AppTheme::Forest => "Forest",
        }
    }

    pub fn parse(s: &str) -> Option<AppTheme> {
        AppTheme::ALL.iter().copied().find(|theme| theme.id() == s)
    }
}

/// Synthesis recipe for a completion sound: sine partials as
/// (frequency Hz, relative amplitude), an exponential decay rate per
/// second, and the clip length.
#[derive(Clone, Copy, Debug)]
pub struct Tone {
    pub partials: &'static [(f32, f32)],
    pub decay: f32,
    pub duration_ms: u32,
}

#[derive(Debug)]
pub struct SoundPack {
    pub id: &'static str,
    pub name: &'static str,
    pub tone: Tone,
}

pub static SOUND_PACKS: [SoundPack; 3] = [
    SoundPack {
        id: "bell",
        name: "Soft Bell",
        tone: Tone {
            partials: &[(660.0, 1.0), (1320.0, 0.45), (1980.0, 0.2)],
            decay: 5.0,
            duration_ms: 900,
        },
    },
    SoundPack {
        id: "chime",
        name: "Calm Chime",
        tone: Tone {
            partials: &[(523.25, 1.0), (659.25, 0.7), (783.99, 0.5)],
            decay: 2.5,
            duration_ms: 1400,
        },
    },
    SoundPack {
        id: "sparkle",
        name: "Sparkle",
        tone: Tone {
            partials: &[(1567.98, 0.8), (2093.0, 0.6), (2637.02, 0.5)],
            decay: 7.0,
            duration_ms: 700,
        },
    },
];

/// Look up a pack by id. Unknown ids fall back to the first pack.
pub fn sound_pack(id: &str) -> &'static SoundPack {
    SOUND_PACKS
        .iter()
        .find(|pack| pack.id == id)
        .unwrap_or(&SOUND_PACKS[0])
}

/// User preferences, persisted alongside the timers.
#[derive(Clone, Copy, Debug)]
pub struct Preferences {
    pub app_theme: AppTheme,
    pub sound: &'static SoundPack,
    pub volume: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            sound: &SOUND_PACKS[0],
            volume: DEFAULT_VOLUME,
        }
    }
}

/// Quick-add presets offered on the board.
pub struct Preset {
    pub minutes: i64,
    pub label: &'static str,
}

pub const PRESETS: [Preset; 4] = [
    Preset { minutes: 5, label: "5 min" },
    Preset { minutes: 15, label: "Coffee 15m" },
    Preset { minutes: 30, label: "Power Nap 30m" },
    Preset { minutes: 60, label: "Deep Work 1h" },
];

/// Parse a `YYYY-MM-DD HH:MM` target entered in local time.
///
/// Dates before today are rejected outright. A time earlier today is
/// accepted and simply finishes on the first tick.
pub fn parse_target_time(input: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), TARGET_TIME_FORMAT).ok()?;
    if naive.date() < Local::now().date_naive() {
        return None;
    }
    let local = naive.and_local_timezone(Local).earliest()?;
    Some(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_theme_ids_round_trip() {
        for theme in TimerTheme::ALL {
            assert_eq!(TimerTheme::parse(theme.id()), Some(theme));
        }
        assert_eq!(TimerTheme::parse("neon"), None);
    }

    #[test]
    fn app_theme_ids_round_trip() {
        for theme in AppTheme::ALL {
            assert_eq!(AppTheme::parse(theme.id()), Some(theme));
        }
        assert_eq!(AppTheme::parse("light"), None);
    }

    #[test]
    fn unknown_sound_id_falls_back_to_first_pack() {
        assert_eq!(sound_pack("chime").id, "chime");
        assert_eq!(sound_pack("airhorn").id, SOUND_PACKS[0].id);
        assert_eq!(sound_pack("").id, "bell");
    }

    #[test]
    fn blank_labels_display_untitled() {
        let timer = Timer {
            id: 1,
            label: "   ".to_string(),
            theme: TimerTheme::Ocean,
            target_time: Utc::now(),
        };
        assert_eq!(timer.display_label(), UNTITLED_LABEL);
    }

    #[test]
    fn parses_future_target() {
        let target = parse_target_time("2999-01-05 09:30").unwrap();
        assert!(target > Utc::now());
    }

    #[test]
    fn rejects_garbage_and_past_dates() {
        assert_eq!(parse_target_time("not a date"), None);
        assert_eq!(parse_target_time("2000-13-40 99:99"), None);
        // Well-formed but before today.
        assert_eq!(parse_target_time("2000-01-01 10:00"), None);
    }

    #[test]
    fn accepts_earlier_time_today() {
        let entry = Local::now().format("%Y-%m-%d 00:00").to_string();
        assert!(parse_target_time(&entry).is_some());
    }

    #[test]
    fn random_theme_resolves_to_known_theme() {
        for _ in 0..20 {
            let theme = ThemeChoice::Random.resolve();
            assert!(TimerTheme::ALL.contains(&theme));
        }
        assert_eq!(
            ThemeChoice::Fixed(TimerTheme::Galaxy).resolve(),
            TimerTheme::Galaxy
        );
    }
}
