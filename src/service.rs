//! Background playback: a second, independently owned player reachable only
//! through commands, and the arbiter deciding who may produce audio.

mod arbiter;
mod controller;

pub use arbiter::{Owner, PlaybackArbiter, Policy};
pub use controller::{BackgroundPlayback, BackgroundStatus, ServiceCmd, ServiceLoop, StatusHandle};

#[cfg(test)]
mod tests;
