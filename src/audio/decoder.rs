use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use lofty::prelude::AudioFile;
use rodio::mixer::Mixer;
use rodio::{OutputStream, Sink, Source};
use tracing::{debug, warn};

use crate::library::{Location, MediaStore};

use super::clock::PlayClock;
use super::sink::{FileSource, create_sink_at, open_output, open_source};
use super::types::{DecodeError, DecoderEvent, Generation, MediaDecoder};

struct PrepareOutcome {
    generation: Generation,
    result: Result<(FileSource, Duration), DecodeError>,
}

struct Loaded {
    generation: Generation,
    path: PathBuf,
}

/// `MediaDecoder` backed by `rodio`.
///
/// Preparation (opening and probing the file) happens on a worker thread; the
/// result is picked up by `poll_event` on the caller's thread.
pub struct RodioDecoder {
    mixer: Mixer,
    _stream: Option<OutputStream>,
    store: Arc<dyn MediaStore>,
    volume: f32,
    tx: Sender<PrepareOutcome>,
    rx: Receiver<PrepareOutcome>,
    loaded: Option<Loaded>,
    pending: Option<FileSource>,
    sink: Option<Sink>,
    clock: PlayClock,
    duration: Option<Duration>,
    completion_reported: bool,
}

impl RodioDecoder {
    /// Decoder that plays through an existing output stream's mixer.
    pub fn new(mixer: Mixer, store: Arc<dyn MediaStore>, volume: f32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            mixer,
            _stream: None,
            store,
            volume,
            tx,
            rx,
            loaded: None,
            pending: None,
            sink: None,
            clock: PlayClock::default(),
            duration: None,
            completion_reported: false,
        }
    }

    /// Decoder that opens and owns its own output stream.
    pub fn with_own_output(store: Arc<dyn MediaStore>, volume: f32) -> Result<Self, DecodeError> {
        let stream = open_output()?;
        let mut decoder = Self::new(stream.mixer().clone(), store, volume);
        decoder._stream = Some(stream);
        Ok(decoder)
    }

    fn current_generation(&self) -> Option<Generation> {
        self.loaded.as_ref().map(|l| l.generation)
    }

    fn rebuild_sink_at(&mut self, position: Duration) {
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        match open_source(&loaded.path) {
            Ok(source) => {
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                let sink = create_sink_at(&self.mixer, source, position, self.volume);
                if self.clock.is_running() {
                    sink.play();
                }
                self.sink = Some(sink);
                self.completion_reported = false;
            }
            Err(e) => warn!(error = %e, "failed to reopen track"),
        }
    }
}

impl MediaDecoder for RodioDecoder {
    fn load(&mut self, location: &Location, generation: Generation) -> Result<(), DecodeError> {
        self.reset();

        let path = self
            .store
            .resolve(location)
            .ok_or_else(|| DecodeError::UnknownLocation(location.clone()))?;
        self.loaded = Some(Loaded {
            generation,
            path: path.clone(),
        });

        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = open_source(&path).map(|source| {
                let duration = source
                    .total_duration()
                    .or_else(|| {
                        lofty::read_from_path(&path)
                            .ok()
                            .map(|t| t.properties().duration())
                    })
                    .unwrap_or(Duration::ZERO);
                (source, duration)
            });
            // The receiver may already be gone if the decoder was dropped.
            let _ = tx.send(PrepareOutcome { generation, result });
        });

        Ok(())
    }

    fn poll_event(&mut self) -> Option<DecoderEvent> {
        if let Ok(outcome) = self.rx.try_recv() {
            let generation = outcome.generation;
            return Some(match outcome.result {
                Ok((source, duration)) => {
                    if Some(generation) == self.current_generation() {
                        self.pending = Some(source);
                        self.duration = Some(duration);
                    } else {
                        debug!(generation = generation.get(), "dropping stale prepared source");
                    }
                    DecoderEvent::Prepared {
                        generation,
                        duration,
                    }
                }
                Err(error) => DecoderEvent::Failed { generation, error },
            });
        }

        let generation = self.current_generation()?;
        let finished = self
            .sink
            .as_ref()
            .is_some_and(|s| self.clock.is_running() && s.empty());
        if finished && !self.completion_reported {
            self.completion_reported = true;
            self.clock.pause(Instant::now());
            return Some(DecoderEvent::Completed { generation });
        }
        None
    }

    fn start(&mut self) {
        let now = Instant::now();
        if self.sink.is_none() {
            let Some(source) = self.pending.take() else {
                return;
            };
            self.sink = Some(create_sink_at(
                &self.mixer,
                source,
                Duration::ZERO,
                self.volume,
            ));
            self.clock.reset();
        } else if self.completion_reported {
            // Starting a finished track plays it again from the top.
            self.clock.reset();
            self.clock.resume(now);
            self.rebuild_sink_at(Duration::ZERO);
        }

        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            self.clock.resume(now);
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
            self.clock.pause(Instant::now());
        }
    }

    fn seek_to(&mut self, position: Duration) {
        if self.sink.is_none() {
            return;
        }
        let position = self.duration.map_or(position, |d| position.min(d));
        self.rebuild_sink_at(position);
        self.clock.set(position, Instant::now());
    }

    fn position(&self) -> Duration {
        let elapsed = self.clock.elapsed(Instant::now());
        self.duration.map_or(elapsed, |d| elapsed.min(d))
    }

    fn is_playing(&self) -> bool {
        self.sink.is_some() && self.clock.is_running()
    }

    fn reset(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.loaded = None;
        self.pending = None;
        self.duration = None;
        self.clock.reset();
        self.completion_reported = false;
    }
}
