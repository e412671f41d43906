//! Row binding for the track list screen.

use crate::library::{MediaStore, Track, format_duration};

/// What one list row displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    pub title: String,
    pub duration: String,
    pub has_artwork: bool,
}

impl TrackRow {
    fn bind(track: &Track, store: &dyn MediaStore) -> Self {
        Self {
            title: track.title().to_string(),
            duration: format_duration(Some(track.duration_ms())),
            has_artwork: store.has_artwork(track.location()),
        }
    }
}

/// Holds the ordered track list and its bound rows. Nothing else is kept
/// between renders.
#[derive(Debug, Default)]
pub struct TrackListPresenter {
    tracks: Vec<Track>,
    rows: Vec<TrackRow>,
}

impl TrackListPresenter {
    pub fn new(tracks: Vec<Track>, store: &dyn MediaStore) -> Self {
        let mut presenter = Self::default();
        presenter.rebind(tracks, store);
        presenter
    }

    /// Replace every row.
    pub fn rebind(&mut self, tracks: Vec<Track>, store: &dyn MediaStore) {
        self.rows = tracks.iter().map(|t| TrackRow::bind(t, store)).collect();
        self.tracks = tracks;
    }

    pub fn rows(&self) -> &[TrackRow] {
        &self.rows
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Hand the track at `index` to `on_click`. Out-of-range rows are ignored.
    pub fn activate<R>(&self, index: usize, on_click: impl FnOnce(&Track) -> R) -> Option<R> {
        self.tracks.get(index).map(on_click)
    }
}
