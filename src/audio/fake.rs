//! Scriptable `MediaDecoder` for tests.
//!
//! Clones share one `FakeLog`, so a test can hand a decoder to the code under
//! test and keep a clone to queue events and inspect calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::library::Location;

use super::types::{DecodeError, DecoderEvent, Generation, MediaDecoder};

#[derive(Debug, Default)]
pub(crate) struct FakeLog {
    pub loads: Vec<(Location, Generation)>,
    pub starts: usize,
    pub pauses: usize,
    pub seeks: Vec<Duration>,
    pub resets: usize,
    pub released: bool,
    pub events: VecDeque<DecoderEvent>,
    pub position: Duration,
    pub playing: bool,
    pub fail_loads: bool,
}

#[derive(Clone, Default)]
pub(crate) struct FakeDecoder {
    log: Arc<Mutex<FakeLog>>,
}

impl FakeDecoder {
    pub fn log(&self) -> MutexGuard<'_, FakeLog> {
        self.log.lock().unwrap()
    }

    pub fn push(&self, event: DecoderEvent) {
        self.log().events.push_back(event);
    }

    pub fn prepared(&self, generation: Generation, duration: Duration) {
        self.push(DecoderEvent::Prepared {
            generation,
            duration,
        });
    }

    pub fn last_generation(&self) -> Generation {
        self.log()
            .loads
            .last()
            .map(|(_, g)| *g)
            .unwrap_or_default()
    }
}

impl MediaDecoder for FakeDecoder {
    fn load(&mut self, location: &Location, generation: Generation) -> Result<(), DecodeError> {
        let mut log = self.log();
        if log.fail_loads {
            return Err(DecodeError::UnknownLocation(location.clone()));
        }
        log.loads.push((location.clone(), generation));
        Ok(())
    }

    fn poll_event(&mut self) -> Option<DecoderEvent> {
        self.log().events.pop_front()
    }

    fn start(&mut self) {
        let mut log = self.log();
        log.starts += 1;
        log.playing = true;
    }

    fn pause(&mut self) {
        let mut log = self.log();
        log.pauses += 1;
        log.playing = false;
    }

    fn seek_to(&mut self, position: Duration) {
        let mut log = self.log();
        log.seeks.push(position);
        log.position = position;
    }

    fn position(&self) -> Duration {
        self.log().position
    }

    fn is_playing(&self) -> bool {
        self.log().playing
    }

    fn reset(&mut self) {
        let mut log = self.log();
        log.resets += 1;
        log.playing = false;
    }

    fn release(&mut self) {
        self.reset();
        self.log().released = true;
    }
}
