//! Media library: the on-disk index of audio files and the ordered track list
//! built from it.
//!
//! `FsMediaIndex` plays the role of the device's media index. Everything that
//! consumes the library goes through the `MediaStore` trait so the loader,
//! presenter and decoders can be exercised against in-memory stores.

use std::path::PathBuf;

mod artwork;
mod codec;
mod display;
mod loader;
mod model;
mod scan;

pub use artwork::read_artwork;
pub use display::{duration_ms, format_duration, format_mmss};
pub use loader::load_tracks;
pub use model::*;
pub use scan::FsMediaIndex;

/// Errors reported by a media store.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("media index at {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

/// A queryable store of audio metadata.
pub trait MediaStore: Send + Sync {
    /// Every row in the index, unfiltered and in no particular order.
    fn query(&self) -> Result<Vec<IndexRow>, LibraryError>;

    /// Map a location back to the file that backs it.
    fn resolve(&self, location: &Location) -> Option<PathBuf>;

    /// Embedded artwork for the resource at `location`, if it carries any.
    fn artwork(&self, location: &Location) -> Option<Artwork> {
        self.resolve(location).and_then(|path| read_artwork(&path))
    }

    /// Cheap artwork presence check used when binding list rows.
    fn has_artwork(&self, location: &Location) -> bool {
        self.artwork(location).is_some()
    }
}

#[cfg(test)]
pub(crate) mod memory;

#[cfg(test)]
mod tests;
