//! The seam between the session controller and whatever actually makes sound.
//!
//! The audio session is an owned value handed to the controller rather than a
//! process-wide global, so tests can substitute a scripted backend. Acquisition
//! is split in two: `begin_load` starts it, `poll_loaded` reports finished
//! loads tagged with the ticket they were started with.

use crate::catalog::AudioRef;
use crate::error::BackendError;

/// How the platform should treat our output relative to other apps and the
/// device's silent switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptionMode {
    /// Lower our volume while another app speaks.
    Duck,
    /// Stop other audio while we play.
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMode {
    pub plays_in_silent_mode: bool,
    pub stays_active_in_background: bool,
    pub interruption: InterruptionMode,
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            plays_in_silent_mode: true,
            stays_active_in_background: true,
            interruption: InterruptionMode::Duck,
        }
    }
}

/// Generation tag attached to every acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub audio: AudioRef,
    pub looping: bool,
}

/// A loaded, looping sound. Created paused.
pub trait SoundHandle {
    fn play(&mut self);
    fn set_volume(&mut self, volume: f32);
    /// Stop and unload. The handle is gone afterwards.
    fn release(self);
}

pub trait AudioBackend {
    type Handle: SoundHandle;

    /// Apply the audio mode. Called once before the first acquisition.
    fn configure(&mut self, mode: &AudioMode) -> Result<(), BackendError>;

    /// Start acquiring a resource. An error here means the load never started.
    fn begin_load(&mut self, request: LoadRequest) -> Result<(), BackendError>;

    /// Completions that have landed since the last call.
    fn poll_loaded(&mut self) -> Vec<(LoadTicket, Result<Self::Handle, BackendError>)>;
}
