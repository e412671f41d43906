use std::cmp::Ordering;

use tracing::{info, warn};

use super::MediaStore;
use super::model::{IndexRow, Track};

fn is_playable_music(row: &IndexRow) -> bool {
    row.is_music && !row.is_alarm && !row.is_ringtone
}

fn compare_titles(a: &IndexRow, b: &IndexRow) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

/// Query `store` for music (not alarms, not ringtones) ordered by title.
///
/// An unavailable index is not an error for callers: it is logged and shows
/// up as an empty library.
pub fn load_tracks(store: &dyn MediaStore) -> Vec<Track> {
    let rows = match store.query() {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "media index unavailable, library is empty");
            return Vec::new();
        }
    };

    let total = rows.len();
    let mut rows: Vec<IndexRow> = rows.into_iter().filter(is_playable_music).collect();
    rows.sort_by(compare_titles);

    info!(total, music = rows.len(), "loaded track list");

    rows.into_iter()
        .map(|r| Track::new(r.id, r.title, r.artist, r.duration_ms))
        .collect()
}
