//! Audio output: the decoder seam used by both players and its `rodio`
//! implementation.

mod clock;
mod decoder;
mod sink;
mod types;

pub use decoder::RodioDecoder;
pub use sink::open_output;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;
