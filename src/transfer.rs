//! The bundle handed from the track list to the player screen.
//!
//! The list screen flattens a `PlayerLaunch` into keyed extras and the player
//! screen rebuilds it, so the player always works on its own copy of the
//! track list. Tracks inside `musicList` use the positional track encoding.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::library::{Location, LocationError, Track};

pub const EXTRA_TITLE: &str = "title";
pub const EXTRA_ARTIST: &str = "artist";
pub const EXTRA_DURATION: &str = "duration";
pub const EXTRA_LOCATION: &str = "musicUri";
pub const EXTRA_THUMBNAIL: &str = "thumbnail";
pub const EXTRA_TRACK_LIST: &str = "musicList";

pub type Extras = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("missing extra `{0}`")]
    Missing(&'static str),
    #[error("extra `{key}` is malformed: {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("extra `{EXTRA_LOCATION}` is not a media location: {0}")]
    Location(#[from] LocationError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLaunch {
    pub title: String,
    pub artist: String,
    pub duration_ms: u64,
    pub location: Location,
    pub thumbnail: Option<Vec<u8>>,
    pub tracks: Vec<Track>,
}

fn required<T: DeserializeOwned>(extras: &Extras, key: &'static str) -> Result<T, TransferError> {
    let value = extras.get(key).ok_or(TransferError::Missing(key))?;
    serde_json::from_value(value.clone()).map_err(|source| TransferError::Malformed { key, source })
}

fn optional<T: DeserializeOwned>(
    extras: &Extras,
    key: &'static str,
) -> Result<Option<T>, TransferError> {
    match extras.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| TransferError::Malformed { key, source }),
    }
}

impl PlayerLaunch {
    /// Launch bundle for `track`, carrying a copy of the whole list.
    pub fn for_track(track: &Track, tracks: &[Track], thumbnail: Option<Vec<u8>>) -> Self {
        Self {
            title: track.title().to_string(),
            artist: track.artist().to_string(),
            duration_ms: track.duration_ms(),
            location: track.location().clone(),
            thumbnail,
            tracks: tracks.to_vec(),
        }
    }

    pub fn into_extras(self) -> Extras {
        let mut extras = Extras::new();
        extras.insert(EXTRA_TITLE.into(), Value::from(self.title));
        extras.insert(EXTRA_ARTIST.into(), Value::from(self.artist));
        extras.insert(EXTRA_DURATION.into(), Value::from(self.duration_ms));
        extras.insert(EXTRA_LOCATION.into(), Value::from(self.location.to_string()));
        if let Some(thumbnail) = self.thumbnail {
            extras.insert(EXTRA_THUMBNAIL.into(), Value::from(thumbnail));
        }
        let tracks = self
            .tracks
            .iter()
            .map(|t| serde_json::to_value(t).unwrap_or(Value::Null))
            .collect();
        extras.insert(EXTRA_TRACK_LIST.into(), Value::Array(tracks));
        extras
    }

    pub fn from_extras(extras: &Extras) -> Result<Self, TransferError> {
        let location: String = required(extras, EXTRA_LOCATION)?;
        Ok(Self {
            title: required(extras, EXTRA_TITLE)?,
            artist: required(extras, EXTRA_ARTIST)?,
            duration_ms: required(extras, EXTRA_DURATION)?,
            location: Location::parse(&location)?,
            thumbnail: optional(extras, EXTRA_THUMBNAIL)?,
            tracks: optional(extras, EXTRA_TRACK_LIST)?.unwrap_or_default(),
        })
    }
}
