//! Scripted audio backend for controller tests.
//!
//! Loads never complete on their own: the test decides when each pending
//! acquisition lands (or fails) through the [`FakeControl`] it keeps after
//! handing the backend to the controller. Every handle that is not released
//! stays in `live`, so a leaked handle shows up in `live_count()`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::backend::{AudioBackend, AudioMode, LoadRequest, LoadTicket, SoundHandle};
use crate::catalog::AudioRef;
use crate::error::BackendError;

#[derive(Debug, Clone)]
pub struct LiveSound {
    pub id: u64,
    pub audio: AudioRef,
    pub playing: bool,
    pub volume: f32,
}

#[derive(Default)]
pub struct FakeState {
    pending: VecDeque<LoadRequest>,
    ready: Vec<(LoadTicket, Result<FakeSound, BackendError>)>,
    live: Vec<LiveSound>,
    started: Vec<LoadRequest>,
    configured: Vec<AudioMode>,
    fail_configure: Option<String>,
    fail_begin: Option<String>,
    next_id: u64,
}

pub struct FakeSound {
    id: u64,
    shared: Rc<RefCell<FakeState>>,
}

impl SoundHandle for FakeSound {
    fn play(&mut self) {
        let mut state = self.shared.borrow_mut();
        if let Some(sound) = state.live.iter_mut().find(|s| s.id == self.id) {
            sound.playing = true;
        }
    }

    fn set_volume(&mut self, volume: f32) {
        let mut state = self.shared.borrow_mut();
        if let Some(sound) = state.live.iter_mut().find(|s| s.id == self.id) {
            sound.volume = volume;
        }
    }

    fn release(self) {
        self.shared.borrow_mut().live.retain(|s| s.id != self.id);
    }
}

pub struct FakeBackend {
    shared: Rc<RefCell<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> (Self, FakeControl) {
        let shared = Rc::new(RefCell::new(FakeState::default()));
        (
            Self {
                shared: shared.clone(),
            },
            FakeControl { shared },
        )
    }
}

impl AudioBackend for FakeBackend {
    type Handle = FakeSound;

    fn configure(&mut self, mode: &AudioMode) -> Result<(), BackendError> {
        let mut state = self.shared.borrow_mut();
        if let Some(reason) = state.fail_configure.clone() {
            return Err(BackendError(reason));
        }
        state.configured.push(*mode);
        Ok(())
    }

    fn begin_load(&mut self, request: LoadRequest) -> Result<(), BackendError> {
        let mut state = self.shared.borrow_mut();
        if let Some(reason) = state.fail_begin.clone() {
            return Err(BackendError(reason));
        }
        state.started.push(request.clone());
        state.pending.push_back(request);
        Ok(())
    }

    fn poll_loaded(&mut self) -> Vec<(LoadTicket, Result<FakeSound, BackendError>)> {
        std::mem::take(&mut self.shared.borrow_mut().ready)
    }
}

pub struct FakeControl {
    shared: Rc<RefCell<FakeState>>,
}

impl FakeControl {
    /// Land the oldest pending acquisition successfully.
    pub fn complete_next(&self) -> bool {
        let request = self.shared.borrow_mut().pending.pop_front();
        let Some(request) = request else {
            return false;
        };

        let sound = {
            let mut state = self.shared.borrow_mut();
            state.next_id += 1;
            let id = state.next_id;
            state.live.push(LiveSound {
                id,
                audio: request.audio.clone(),
                playing: false,
                volume: 1.0,
            });
            FakeSound {
                id,
                shared: self.shared.clone(),
            }
        };
        self.shared
            .borrow_mut()
            .ready
            .push((request.ticket, Ok(sound)));
        true
    }

    pub fn complete_all(&self) {
        while self.complete_next() {}
    }

    /// Fail the oldest pending acquisition.
    pub fn fail_next(&self, reason: &str) -> bool {
        let mut state = self.shared.borrow_mut();
        match state.pending.pop_front() {
            Some(request) => {
                state
                    .ready
                    .push((request.ticket, Err(BackendError(reason.to_string()))));
                true
            }
            None => false,
        }
    }

    pub fn fail_configure(&self, reason: &str) {
        self.shared.borrow_mut().fail_configure = Some(reason.to_string());
    }

    pub fn fail_begin(&self, reason: Option<&str>) {
        self.shared.borrow_mut().fail_begin = reason.map(str::to_string);
    }

    pub fn live(&self) -> Vec<LiveSound> {
        self.shared.borrow().live.clone()
    }

    pub fn live_count(&self) -> usize {
        self.shared.borrow().live.len()
    }

    pub fn pending_count(&self) -> usize {
        self.shared.borrow().pending.len()
    }

    pub fn started(&self) -> Vec<LoadRequest> {
        self.shared.borrow().started.clone()
    }

    pub fn configured(&self) -> Vec<AudioMode> {
        self.shared.borrow().configured.clone()
    }
}
