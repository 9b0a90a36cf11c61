//! Countdown engine.
//!
//! A `Countdown` is a wall-clock state machine with no internal thread;
//! the caller passes `now` into every query and transition and drives
//! `tick()` from the event loop.
//!
//! ```text
//! Running <-> Paused
//! Running -> Finished   (terminal)
//! ```
//!
//! Pausing freezes the remaining span. Resuming pushes the deadline
//! forward by however long the pause lasted, so the frozen span is what
//! keeps counting down. A paused countdown never finishes on its own,
//! even when the original deadline passes while paused.

use chrono::{DateTime, TimeDelta, Utc};

/// Rendered in place of the remaining time once a countdown finishes.
pub const TIME_UP: &str = "Time's up!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Finished,
}

#[derive(Clone, Debug)]
pub struct Countdown {
    deadline: DateTime<Utc>,
    /// Span from creation to the deadline, captured once for progress.
    total: TimeDelta,
    phase: Phase,
    paused_at: Option<DateTime<Utc>>,
    fired: bool,
}

impl Countdown {
    /// Start counting toward `target`. A target at or before `now` is
    /// allowed and finishes on the first tick.
    pub fn new(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            deadline: target,
            total: target - now,
            phase: Phase::Running,
            paused_at: None,
            fired: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Time left until the deadline, clamped at zero. While paused this
    /// is frozen at the span that was left when the pause began.
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeDelta {
        let raw = match self.phase {
            Phase::Finished => TimeDelta::zero(),
            Phase::Paused => match self.paused_at {
                Some(paused_at) => self.deadline - paused_at,
                None => self.deadline - now,
            },
            Phase::Running => self.deadline - now,
        };
        raw.max(TimeDelta::zero())
    }

    /// 0.0 ..= 1.0 of the original span already elapsed. A countdown
    /// created with no span to begin with reads as complete.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let total_ms = self.total.num_milliseconds();
        if total_ms <= 0 {
            return 1.0;
        }
        let left = self.remaining(now).num_milliseconds() as f64;
        (1.0 - left / total_ms as f64).clamp(0.0, 1.0)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Freeze the countdown. No-op unless running.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            self.paused_at = Some(now);
        }
    }

    /// Continue a paused countdown from its frozen remaining span.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.phase != Phase::Paused {
            return;
        }
        if let Some(paused_at) = self.paused_at.take() {
            self.deadline += now - paused_at;
        }
        self.phase = Phase::Running;
    }

    /// Advance the clock. Returns `true` exactly once, on the tick that
    /// crosses the deadline; later ticks on the finished countdown stay
    /// quiet so the completion effect cannot fire twice.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::Running || now < self.deadline {
            return false;
        }
        self.phase = Phase::Finished;
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }
}

/// Render a remaining span as `"2d 5h 0m 13s"`, components floored and
/// always all four present. Zero or negative spans render [`TIME_UP`].
pub fn format_remaining(remaining: TimeDelta) -> String {
    let ms = remaining.num_milliseconds();
    if ms <= 0 {
        return TIME_UP.to_string();
    }
    let total_secs = ms / 1000;
    let d = total_secs / 86_400;
    let h = total_secs / 3_600 % 24;
    let m = total_secs / 60 % 60;
    let s = total_secs % 60;
    format!("{d}d {h}h {m}m {s}s")
}
