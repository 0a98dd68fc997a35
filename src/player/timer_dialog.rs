//! Duration picker for the sleep timer.
//!
//! Three fields (hours, minutes, seconds) with one focused at a time. Up/Down
//! change the focused field, digits type into it, Tab/Left/Right move focus.

use crate::session::TimerDuration;

const MAX_HOURS: u64 = 23;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerField {
    Hours,
    Minutes,
    Seconds,
}

impl TimerField {
    fn next(self) -> Self {
        match self {
            TimerField::Hours => TimerField::Minutes,
            TimerField::Minutes => TimerField::Seconds,
            TimerField::Seconds => TimerField::Hours,
        }
    }

    fn prev(self) -> Self {
        match self {
            TimerField::Hours => TimerField::Seconds,
            TimerField::Minutes => TimerField::Hours,
            TimerField::Seconds => TimerField::Minutes,
        }
    }

    fn max(self) -> u64 {
        match self {
            TimerField::Hours => MAX_HOURS,
            TimerField::Minutes | TimerField::Seconds => 59,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TimerDialog {
    pub duration: TimerDuration,
    pub focus: TimerField,
}

impl TimerDialog {
    /// Open on `initial`, usually the time left on an armed timer.
    pub fn new(initial: TimerDuration) -> Self {
        Self {
            duration: TimerDuration::new(
                initial.hours.min(MAX_HOURS),
                initial.minutes,
                initial.seconds,
            ),
            focus: TimerField::Minutes,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn field_mut(&mut self) -> &mut u64 {
        match self.focus {
            TimerField::Hours => &mut self.duration.hours,
            TimerField::Minutes => &mut self.duration.minutes,
            TimerField::Seconds => &mut self.duration.seconds,
        }
    }

    /// Step the focused field, wrapping within its range.
    pub fn adjust(&mut self, delta: i64) {
        let max = self.focus.max() as i64;
        let field = self.field_mut();
        let value = (*field as i64 + delta).rem_euclid(max + 1);
        *field = value as u64;
    }

    /// Type a digit into the focused field. Keeps the last two digits typed.
    pub fn push_digit(&mut self, digit: u32) {
        let max = self.focus.max();
        let field = self.field_mut();
        let typed = (*field % 10) * 10 + u64::from(digit);
        *field = if typed <= max { typed } else { u64::from(digit) };
    }

    pub fn clear_field(&mut self) {
        *self.field_mut() = 0;
    }

    pub fn total_seconds(&self) -> u64 {
        self.duration.total_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dialog_focuses_minutes() {
        let dialog = TimerDialog::new(TimerDuration::default());
        assert_eq!(dialog.focus, TimerField::Minutes);
        assert_eq!(dialog.total_seconds(), 0);
    }

    #[test]
    fn test_focus_cycles() {
        let mut dialog = TimerDialog::new(TimerDuration::default());
        dialog.focus_next();
        assert_eq!(dialog.focus, TimerField::Seconds);
        dialog.focus_next();
        assert_eq!(dialog.focus, TimerField::Hours);
        dialog.focus_prev();
        assert_eq!(dialog.focus, TimerField::Seconds);
    }

    #[test]
    fn test_adjust_wraps() {
        let mut dialog = TimerDialog::new(TimerDuration::default());
        dialog.adjust(-1);
        assert_eq!(dialog.duration.minutes, 59);
        dialog.adjust(1);
        assert_eq!(dialog.duration.minutes, 0);

        dialog.focus_prev();
        dialog.adjust(-1);
        assert_eq!(dialog.duration.hours, MAX_HOURS);
    }

    #[test]
    fn test_push_digit() {
        let mut dialog = TimerDialog::new(TimerDuration::default());
        dialog.push_digit(4);
        dialog.push_digit(5);
        assert_eq!(dialog.duration.minutes, 45);

        // 57 is fine, 75 is not a valid minute
        dialog.push_digit(7);
        assert_eq!(dialog.duration.minutes, 57);
        dialog.clear_field();
        dialog.push_digit(7);
        dialog.push_digit(5);
        assert_eq!(dialog.duration.minutes, 5);
    }

    #[test]
    fn test_total_seconds() {
        let dialog = TimerDialog::new(TimerDuration::new(1, 30, 15));
        assert_eq!(dialog.total_seconds(), 5415);
    }
}
