//! rodio implementation of the audio backend.
//!
//! Files are opened and decoded on a short-lived worker thread so the UI loop
//! never blocks on disk. Finished decoders come back over a channel tagged with
//! their load ticket, and the sink is only created on the caller's thread when
//! the controller polls for them.

use log::{debug, info, warn};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::error::BackendError;
use crate::session::{AudioBackend, AudioMode, LoadRequest, LoadTicket, SoundHandle};

type Decoded = Decoder<BufReader<File>>;
type LoadResult = (LoadTicket, bool, Result<Decoded, BackendError>);

pub struct RodioSound {
    sink: Sink,
}

impl SoundHandle for RodioSound {
    fn play(&mut self) {
        self.sink.play();
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn release(self) {
        self.sink.stop();
    }
}

pub struct RodioBackend {
    // Sinks hold a mixer connected to this stream; it must outlive them
    stream: OutputStream,
    sounds_dir: PathBuf,
    loaded_tx: mpsc::Sender<LoadResult>,
    loaded_rx: mpsc::Receiver<LoadResult>,
}

impl RodioBackend {
    /// Open the default output device. Sounds are looked up relative to
    /// `sounds_dir`.
    pub fn new(sounds_dir: PathBuf) -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError(format!("Failed to open audio output: {e}")))?;
        stream.log_on_drop(false);

        let (loaded_tx, loaded_rx) = mpsc::channel();
        info!("Audio output opened, sounds in {}", sounds_dir.display());

        Ok(Self {
            stream,
            sounds_dir,
            loaded_tx,
            loaded_rx,
        })
    }
}

fn decode(path: &Path) -> Result<Decoded, BackendError> {
    let file = File::open(path)
        .map_err(|e| BackendError(format!("{}: {e}", path.display())))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| BackendError(format!("{}: {e}", path.display())))
}

impl AudioBackend for RodioBackend {
    type Handle = RodioSound;

    fn configure(&mut self, mode: &AudioMode) -> Result<(), BackendError> {
        // A desktop output device has no silent switch or background policy to
        // apply, so the mode is only recorded.
        info!(
            "Audio mode: silent_mode={} background={} interruption={:?}",
            mode.plays_in_silent_mode, mode.stays_active_in_background, mode.interruption
        );
        Ok(())
    }

    fn begin_load(&mut self, request: LoadRequest) -> Result<(), BackendError> {
        let path = self.sounds_dir.join(&request.audio.0);
        if !path.is_file() {
            return Err(BackendError(format!("{} not found", path.display())));
        }

        let tx = self.loaded_tx.clone();
        thread::Builder::new()
            .name(format!("decode-{}", request.ticket.0))
            .spawn(move || {
                debug!("Decoding {}", path.display());
                let result = decode(&path);
                // The backend may be gone by now
                let _ = tx.send((request.ticket, request.looping, result));
            })
            .map_err(|e| BackendError(format!("Failed to start decoder thread: {e}")))?;

        Ok(())
    }

    fn poll_loaded(&mut self) -> Vec<(LoadTicket, Result<RodioSound, BackendError>)> {
        self.loaded_rx
            .try_iter()
            .map(|(ticket, looping, result)| {
                let handle = result.map(|decoder| {
                    let sink = Sink::connect_new(self.stream.mixer());
                    sink.pause();
                    if looping {
                        sink.append(decoder.repeat_infinite());
                    } else {
                        sink.append(decoder);
                    }
                    RodioSound { sink }
                });
                if let Err(e) = &handle {
                    warn!("Load {} failed: {e}", ticket.0);
                }
                (ticket, handle)
            })
            .collect()
    }
}
