//! In-memory `MediaStore` used by tests across the crate.

use std::collections::HashMap;
use std::path::PathBuf;

use super::{Artwork, IndexRow, LibraryError, Location, MediaStore};

#[derive(Default)]
pub(crate) struct MemoryStore {
    pub rows: Vec<IndexRow>,
    pub artwork: HashMap<String, Artwork>,
    pub unavailable: bool,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<IndexRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

pub(crate) fn row(id: &str, title: &str) -> IndexRow {
    IndexRow {
        id: id.to_string(),
        title: title.to_string(),
        artist: "Artist".to_string(),
        duration_ms: 180_000,
        is_music: true,
        is_alarm: false,
        is_ringtone: false,
        path: PathBuf::from(format!("/music/{id}.mp3")),
    }
}

impl MediaStore for MemoryStore {
    fn query(&self) -> Result<Vec<IndexRow>, LibraryError> {
        if self.unavailable {
            return Err(LibraryError::NotADirectory(PathBuf::from("/music")));
        }
        Ok(self.rows.clone())
    }

    fn resolve(&self, location: &Location) -> Option<PathBuf> {
        self.rows
            .iter()
            .find(|r| r.id == location.id())
            .map(|r| r.path.clone())
    }

    fn artwork(&self, location: &Location) -> Option<Artwork> {
        self.artwork.get(location.id()).cloned()
    }
}
