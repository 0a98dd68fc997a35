//! Playback session: the controller, its audio backend seam and the sleep timer.

pub mod backend;
pub mod controller;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{AudioBackend, AudioMode, InterruptionMode, LoadRequest, LoadTicket, SoundHandle};
pub use controller::{SessionController, SessionState};
pub use timer::{MAX_TIMER_SECS, SleepTimer, TimerDuration, format_remaining};
