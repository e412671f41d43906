//! Utilities for opening the output device and building `rodio` sinks.
//!
//! Seeking rebuilds the sink: the file is reopened and decoded from the start
//! with `skip_duration`, which works for every format `rodio` can read.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::types::DecodeError;

pub(crate) type FileSource = Decoder<BufReader<File>>;

/// Open the default output stream.
pub fn open_output() -> Result<OutputStream, DecodeError> {
    let mut stream =
        OutputStreamBuilder::open_default_stream().map_err(|e| DecodeError::Output(e.to_string()))?;
    // rodio logs to stderr when OutputStream is dropped, which would land on
    // top of the TUI.
    stream.log_on_drop(false);
    Ok(stream)
}

/// Open and decode the file at `path`.
pub(super) fn open_source(path: &Path) -> Result<FileSource, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| DecodeError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Create a paused `Sink` on `mixer` that plays `source` from `start_at`.
pub(super) fn create_sink_at(
    mixer: &Mixer,
    source: FileSource,
    start_at: Duration,
    volume: f32,
) -> Sink {
    let sink = Sink::connect_new(mixer);
    sink.set_volume(volume);
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.pause();
    sink
}
