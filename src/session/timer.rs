//! Sleep timer: a single one-shot deadline that pauses playback.
//!
//! The timer does not own a thread. The controller checks it from its tick,
//! so it fires on the first tick at or after the deadline and never before.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::error::PlayerError;

/// Longest sleep timer accepted: one week.
pub const MAX_TIMER_SECS: u64 = 7 * 24 * 3600;

/// Duration as entered in the picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimerDuration {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl fmt::Display for TimerDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_remaining(self.total_seconds()))
    }
}

impl FromStr for TimerDuration {
    type Err = PlayerError;

    /// Accepts `90` (seconds), `90s`, `45m`, `1h30m`, `1h 30m 10s`,
    /// `MM:SS` and `HH:MM:SS`, up to [`MAX_TIMER_SECS`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let duration = parse_duration(s)?;
        if duration.total_seconds() > MAX_TIMER_SECS {
            return Err(PlayerError::InvalidDuration(s.to_string()));
        }
        Ok(duration)
    }
}

fn parse_duration(s: &str) -> Result<TimerDuration, PlayerError> {
    let invalid = || PlayerError::InvalidDuration(s.to_string());
    let text = s.trim().to_lowercase();
    if text.is_empty() {
        return Err(invalid());
    }

    if text.contains(':') {
        let nums = text
            .split(':')
            .map(|part| part.trim().parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        return match nums.as_slice() {
            [h, m, sec] => Ok(TimerDuration::new(*h, *m, *sec)),
            [m, sec] => Ok(TimerDuration::new(0, *m, *sec)),
            _ => Err(invalid()),
        };
    }

    if text.chars().all(|c| c.is_ascii_digit()) {
        let secs = text.parse::<u64>().map_err(|_| invalid())?;
        return Ok(TimerDuration::new(0, 0, secs));
    }

    let mut duration = TimerDuration::default();
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if c.is_whitespace() {
            continue;
        }
        let value = digits.parse::<u64>().map_err(|_| invalid())?;
        digits.clear();
        match c {
            'h' => duration.hours = duration.hours.saturating_add(value),
            'm' => duration.minutes = duration.minutes.saturating_add(value),
            's' => duration.seconds = duration.seconds.saturating_add(value),
            _ => return Err(invalid()),
        }
    }
    if !digits.is_empty() {
        return Err(invalid());
    }

    Ok(duration)
}

/// `H:MM:SS` when an hour or more remains, `MM:SS` otherwise.
pub fn format_remaining(total: u64) -> String {
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[derive(Debug, Default)]
pub struct SleepTimer {
    deadline: Option<Instant>,
    scheduled_stop_id: Option<u64>,
    next_id: u64,
}

impl SleepTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `seconds` from `now`, replacing any armed timer. Zero cancels.
    /// Longer requests are capped at [`MAX_TIMER_SECS`].
    pub fn arm_at(&mut self, seconds: u64, now: Instant) -> Option<u64> {
        if seconds == 0 {
            self.cancel();
            return None;
        }

        let seconds = seconds.min(MAX_TIMER_SECS);
        let Some(deadline) = now.checked_add(Duration::from_secs(seconds)) else {
            self.cancel();
            return None;
        };

        self.next_id += 1;
        self.deadline = Some(deadline);
        self.scheduled_stop_id = Some(self.next_id);
        self.scheduled_stop_id
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.scheduled_stop_id = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn scheduled_stop_id(&self) -> Option<u64> {
        self.scheduled_stop_id
    }

    /// Whole seconds left, rounded up so the readout never shows zero while
    /// the timer is still armed.
    pub fn remaining_at(&self, now: Instant) -> u64 {
        match self.deadline {
            Some(deadline) => {
                let left = deadline.saturating_duration_since(now);
                let secs = left.as_secs();
                if left.subsec_nanos() > 0 { secs + 1 } else { secs }
            }
            None => 0,
        }
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }
}
