//! Decoder-facing types: the `MediaDecoder` seam, its events and errors.

use std::path::PathBuf;
use std::time::Duration;

use crate::library::Location;

/// Tag attached to every prepare request.
///
/// Each new request gets a strictly larger generation, so a completion that
/// carries an older one answers a request that has since been abandoned.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("no audio output device: {0}")]
    Output(String),
    #[error("no media for {0}")]
    UnknownLocation(Location),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Asynchronous notifications from a decoder.
#[derive(Debug)]
pub enum DecoderEvent {
    /// Preparation finished; the track can start.
    Prepared {
        generation: Generation,
        duration: Duration,
    },
    /// Playback reached the end of the track.
    Completed { generation: Generation },
    /// Preparation or playback failed.
    Failed {
        generation: Generation,
        error: DecodeError,
    },
}

impl DecoderEvent {
    pub fn generation(&self) -> Generation {
        match self {
            Self::Prepared { generation, .. }
            | Self::Completed { generation }
            | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// One decoder/player instance.
///
/// `load` only starts preparation; the outcome arrives later through
/// `poll_event`. All other calls act on whatever is currently loaded and are
/// no-ops when nothing is.
pub trait MediaDecoder {
    fn load(&mut self, location: &Location, generation: Generation) -> Result<(), DecodeError>;
    fn poll_event(&mut self) -> Option<DecoderEvent>;
    fn start(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, position: Duration);
    fn position(&self) -> Duration;
    fn is_playing(&self) -> bool;
    /// Stop and forget the loaded track. The decoder stays usable.
    fn reset(&mut self);
    /// Final teardown; the decoder is not used afterwards.
    fn release(&mut self) {
        self.reset();
    }
}
