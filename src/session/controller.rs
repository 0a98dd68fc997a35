//! Playback session controller.
//!
//! Owns the one live sound resource, the sleep timer, and the volume. All
//! commands run on the caller's thread; acquisitions complete asynchronously
//! and are collected by [`SessionController::tick`]. Every command that
//! invalidates the current resource bumps a generation counter, and a
//! completion tagged with anything but the pending ticket is released on
//! arrival.

use std::fmt;
use std::time::Instant;

use log::{debug, info, warn};

use super::backend::{AudioBackend, AudioMode, LoadRequest, LoadTicket, SoundHandle};
use super::timer::SleepTimer;
use crate::catalog::{Catalog, SoundEntry};
use crate::constants::DEFAULT_VOLUME;
use crate::error::{BackendError, PlayerError, Result};
use crate::user::RecentRecorder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No track selected.
    Idle,
    /// Waiting for the backend to hand over a resource.
    Loading,
    Playing,
    /// Track selected, resource released.
    Paused,
    /// The last acquisition failed. `play()` retries.
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Playing => "playing",
            SessionState::Paused => "paused",
            SessionState::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

pub struct SessionController<B: AudioBackend> {
    backend: B,
    catalog: Catalog,
    mode: AudioMode,
    configured: bool,
    state: SessionState,
    active: Option<usize>,
    handle: Option<B::Handle>,
    volume: f32,
    generation: u64,
    pending: Option<LoadTicket>,
    // Set by select_track, cleared once the selection first reaches Playing
    announce: bool,
    timer: SleepTimer,
    recorder: Option<(Box<dyn RecentRecorder>, String)>,
    notices: Vec<PlayerError>,
}

impl<B: AudioBackend> SessionController<B> {
    pub fn new(backend: B, catalog: Catalog) -> Self {
        Self {
            backend,
            catalog,
            mode: AudioMode::default(),
            configured: false,
            state: SessionState::Idle,
            active: None,
            handle: None,
            volume: DEFAULT_VOLUME,
            generation: 0,
            pending: None,
            announce: false,
            timer: SleepTimer::new(),
            recorder: None,
            notices: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: AudioMode) -> Self {
        self.mode = mode;
        self
    }

    /// Report newly selected tracks to `recorder` on behalf of `user_id`.
    pub fn with_recorder(
        mut self,
        recorder: Box<dyn RecentRecorder>,
        user_id: impl Into<String>,
    ) -> Self {
        self.recorder = Some((recorder, user_id.into()));
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while playback is running or about to start.
    pub fn is_playing(&self) -> bool {
        matches!(self.state, SessionState::Playing | SessionState::Loading)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_entry(&self) -> Option<&SoundEntry> {
        self.active.and_then(|i| self.catalog.get(i))
    }

    pub fn has_resource(&self) -> bool {
        self.handle.is_some()
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn timer_remaining(&self) -> u64 {
        self.timer_remaining_at(Instant::now())
    }

    pub fn timer_remaining_at(&self, now: Instant) -> u64 {
        self.timer.remaining_at(now)
    }

    /// Conditions reported since the last call, oldest first.
    pub fn drain_notices(&mut self) -> Vec<PlayerError> {
        std::mem::take(&mut self.notices)
    }

    /// Select a track by route parameter and start loading it.
    ///
    /// An unknown title fails with [`PlayerError::NotFound`] and leaves the
    /// current session untouched.
    pub fn select_track(&mut self, route_param: &str) -> Result<()> {
        let Some((index, entry)) = self.catalog.resolve(route_param) else {
            warn!("No catalog entry for '{route_param}'");
            return Err(PlayerError::NotFound(route_param.to_string()));
        };
        info!("Selected {} (catalog #{index})", entry.title);

        self.invalidate();
        self.active = Some(index);
        self.announce = true;
        self.begin_load();
        Ok(())
    }

    pub fn play(&mut self) {
        match self.state {
            SessionState::Playing | SessionState::Loading => {
                debug!("play() ignored, already {}", self.state);
            }
            SessionState::Paused | SessionState::Stopped if self.active.is_some() => {
                self.begin_load();
            }
            _ => warn!("play() with no track selected"),
        }
    }

    /// Stop playback and release the resource. Pausing while a load is in
    /// flight abandons that load.
    pub fn pause(&mut self) {
        match self.state {
            SessionState::Playing | SessionState::Loading => {
                self.invalidate();
                self.state = SessionState::Paused;
                info!("Paused");
            }
            _ => debug!("pause() ignored while {}", self.state),
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Clamp to [0, 1] and apply to the live resource, if any. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            warn!("Ignoring NaN volume");
            return;
        }

        self.volume = volume.clamp(0.0, 1.0);
        if let Some(handle) = self.handle.as_mut() {
            handle.set_volume(self.volume);
        }
        debug!("Volume set to {:.2}", self.volume);
    }

    pub fn arm_timer(&mut self, seconds: u64) {
        self.arm_timer_at(seconds, Instant::now());
    }

    /// Replace any armed timer. Zero disarms.
    pub fn arm_timer_at(&mut self, seconds: u64, now: Instant) {
        match self.timer.arm_at(seconds, now) {
            Some(id) => info!(
                "Sleep timer #{id} armed for {}s",
                self.timer.remaining_at(now)
            ),
            None => info!("Sleep timer disarmed"),
        }
    }

    pub fn cancel_timer(&mut self) {
        if self.timer.is_armed() {
            info!("Sleep timer cancelled");
        }
        self.timer.cancel();
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Collect finished loads, then fire the sleep timer if it is due.
    pub fn tick_at(&mut self, now: Instant) {
        self.pump();

        if self.timer.poll(now) {
            info!("Sleep timer expired");
            self.pause();
        }
    }

    /// End the session: release everything, drop in-flight loads, disarm the
    /// timer. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.invalidate();

        // Anything that already landed belongs to an old generation now
        for (ticket, result) in self.backend.poll_loaded() {
            if let Ok(handle) = result {
                debug!("Releasing resource from load {} during teardown", ticket.0);
                handle.release();
            }
        }

        if self.state != SessionState::Idle {
            info!("Session torn down");
        }
        self.state = SessionState::Idle;
        self.active = None;
        self.announce = false;
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(ticket) = self.pending.take() {
            debug!("Abandoning load {}", ticket.0);
        }
        if let Some(handle) = self.handle.take() {
            handle.release();
            debug!("Released resource");
        }
    }

    fn begin_load(&mut self) {
        let Some(entry) = self.active_entry().cloned() else {
            return;
        };

        if !self.configured {
            if let Err(e) = self.backend.configure(&self.mode) {
                self.fail_load(&entry.title, e);
                return;
            }
            debug!("Audio mode configured: {:?}", self.mode);
            self.configured = true;
        }

        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        let request = LoadRequest {
            ticket,
            audio: entry.audio_ref.clone(),
            looping: true,
        };

        match self.backend.begin_load(request) {
            Ok(()) => {
                debug!("Loading {} as load {}", entry.title, ticket.0);
                self.pending = Some(ticket);
                self.state = SessionState::Loading;
            }
            Err(e) => self.fail_load(&entry.title, e),
        }
    }

    fn pump(&mut self) {
        for (ticket, result) in self.backend.poll_loaded() {
            if self.pending != Some(ticket) {
                match result {
                    Ok(handle) => {
                        debug!("Releasing stale resource from load {}", ticket.0);
                        handle.release();
                    }
                    Err(e) => debug!("Ignoring stale failure from load {}: {e}", ticket.0),
                }
                continue;
            }

            self.pending = None;
            let title = self
                .active_entry()
                .map(|e| e.title.clone())
                .unwrap_or_default();

            match result {
                Ok(mut handle) => {
                    if let Some(old) = self.handle.take() {
                        old.release();
                    }
                    handle.set_volume(self.volume);
                    handle.play();
                    self.handle = Some(handle);
                    self.state = SessionState::Playing;
                    info!("Playing {title} at volume {:.2}", self.volume);

                    if self.announce {
                        self.announce = false;
                        self.record_recent();
                    }
                }
                Err(e) => self.fail_load(&title, e),
            }
        }
    }

    fn fail_load(&mut self, title: &str, e: BackendError) {
        warn!("Failed to load {title}: {e}");
        self.pending = None;
        self.state = SessionState::Stopped;
        self.notices.push(PlayerError::ResourceLoad {
            title: title.to_string(),
            reason: e.to_string(),
        });
    }

    fn record_recent(&mut self) {
        let Some(index) = self.active else {
            return;
        };
        if let Some((recorder, user)) = self.recorder.as_mut() {
            match recorder.record_played(user.as_str(), index) {
                Ok(()) => debug!("Recorded catalog #{index} as recently played"),
                Err(e) => warn!("{e}"),
            }
        }
    }
}

impl<B: AudioBackend> Drop for SessionController<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
