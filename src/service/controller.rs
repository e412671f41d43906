use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::audio::{DecodeError, DecoderEvent, Generation, MediaDecoder, RodioDecoder};
use crate::library::{Location, MediaStore};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Commands accepted by the background player. Nothing is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCmd {
    /// Replace whatever is playing with the location string.
    Play(String),
    Stop,
    Shutdown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundStatus {
    pub location: Option<Location>,
    pub playing: bool,
    /// Number of the `Play` request, counting from 1, whose track last ran to
    /// its end or failed.
    pub finished_request: Option<u64>,
}

pub type StatusHandle = Arc<Mutex<BackgroundStatus>>;

/// The command handling of the background player, independent of the thread
/// that drives it.
pub struct ServiceLoop<D: MediaDecoder> {
    decoder: D,
    generation: Generation,
    requests: u64,
    status: StatusHandle,
}

impl<D: MediaDecoder> ServiceLoop<D> {
    pub fn new(decoder: D, status: StatusHandle) -> Self {
        Self {
            decoder,
            generation: Generation::default(),
            requests: 0,
            status,
        }
    }

    fn publish(&self, location: Option<Location>, playing: bool) {
        if let Ok(mut status) = self.status.lock() {
            status.location = location;
            status.playing = playing;
        }
    }

    fn set_playing(&self, playing: bool) {
        if let Ok(mut status) = self.status.lock() {
            status.playing = playing;
        }
    }

    fn finish(&mut self) {
        self.stop();
        if let Ok(mut status) = self.status.lock() {
            status.finished_request = Some(self.requests);
        }
    }

    /// Returns false once the loop should exit.
    pub fn handle(&mut self, cmd: ServiceCmd) -> bool {
        match cmd {
            ServiceCmd::Play(raw) => {
                self.requests += 1;
                if raw.is_empty() {
                    debug!("ignoring play request without a location");
                    return true;
                }
                let location = match Location::parse(&raw) {
                    Ok(location) => location,
                    Err(e) => {
                        warn!(error = %e, "ignoring play request");
                        return true;
                    }
                };
                self.stop();
                match self.decoder.load(&location, self.generation) {
                    Ok(()) => {
                        info!(%location, "background playback requested");
                        self.publish(Some(location), false);
                    }
                    Err(e) => error!(%location, error = %e, "background decoder setup failed"),
                }
                true
            }
            ServiceCmd::Stop => {
                self.stop();
                true
            }
            ServiceCmd::Shutdown => false,
        }
    }

    fn stop(&mut self) {
        self.generation = self.generation.next();
        self.decoder.reset();
        self.publish(None, false);
    }

    /// Apply decoder events for the current request.
    pub fn pump(&mut self) {
        while let Some(event) = self.decoder.poll_event() {
            if event.generation() != self.generation {
                debug!(stale = event.generation().get(), "discarding background event");
                continue;
            }
            match event {
                DecoderEvent::Prepared { .. } => {
                    self.decoder.start();
                    self.set_playing(self.decoder.is_playing());
                }
                DecoderEvent::Completed { .. } => {
                    debug!("background track finished");
                    self.finish();
                }
                DecoderEvent::Failed { error, .. } => {
                    error!(%error, "background playback failed");
                    self.finish();
                }
            }
        }
    }

    pub fn release(&mut self) {
        self.decoder.release();
        self.publish(None, false);
    }

    fn run(mut self, rx: Receiver<ServiceCmd>) {
        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(cmd) => {
                    if !self.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.pump();
        }
        self.release();
        debug!("background player stopped");
    }
}

/// Handle to the background player thread.
///
/// Created at startup and torn down with `shutdown`; the decoder lives on the
/// service thread and is never shared.
pub struct BackgroundPlayback {
    tx: Sender<ServiceCmd>,
    requested: AtomicU64,
    status: StatusHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundPlayback {
    /// Start the service with its own output stream.
    pub fn start(store: Arc<dyn MediaStore>, volume: f32) -> Self {
        Self::spawn(move || RodioDecoder::with_own_output(store, volume))
    }

    /// Start the service with a decoder built on the service thread.
    pub fn spawn<D, F>(make_decoder: F) -> Self
    where
        D: MediaDecoder + 'static,
        F: FnOnce() -> Result<D, DecodeError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<ServiceCmd>();
        let status: StatusHandle = Arc::default();
        let thread_status = status.clone();

        let handle = thread::spawn(move || match make_decoder() {
            Ok(decoder) => ServiceLoop::new(decoder, thread_status).run(rx),
            Err(e) => error!(error = %e, "background player unavailable"),
        });

        Self {
            tx,
            requested: AtomicU64::new(0),
            status,
            join: Mutex::new(Some(handle)),
        }
    }

    fn send(&self, cmd: ServiceCmd) -> Result<(), mpsc::SendError<ServiceCmd>> {
        self.tx.send(cmd)
    }

    pub fn play(&self, location: &Location) {
        self.requested.fetch_add(1, Ordering::Relaxed);
        if self.send(ServiceCmd::Play(location.to_string())).is_err() {
            warn!("background player is not running");
        }
    }

    pub fn stop(&self) {
        let _ = self.send(ServiceCmd::Stop);
    }

    pub fn status(&self) -> BackgroundStatus {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// True once the track from the latest `play` has ended on its own.
    pub fn finished(&self) -> bool {
        let requested = self.requested.load(Ordering::Relaxed);
        requested > 0 && self.status().finished_request == Some(requested)
    }

    /// Stop the service thread and wait for it to release its decoder.
    pub fn shutdown(&self) {
        let _ = self.send(ServiceCmd::Shutdown);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for BackgroundPlayback {
    fn drop(&mut self) {
        self.shutdown();
    }
}
