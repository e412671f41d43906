use std::fmt;
use std::path::PathBuf;

/// Prefix of every location handed out by the media index.
pub const LOCATION_SCHEME: &str = "media://audio/";

/// Placeholder the index reports for files without an artist tag.
pub const UNKNOWN_ARTIST: &str = "<unknown>";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("`{0}` is not a media location")]
    Scheme(String),
    #[error("`{0}` does not name a media id")]
    MissingId(String),
}

/// Opaque reference to one playable resource in the media index.
///
/// Locations are derived from a row id, so the same row always yields the
/// same location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    pub fn for_id(id: &str) -> Self {
        Self(format!("{LOCATION_SCHEME}{id}"))
    }

    /// Parse the string form produced by `Display`.
    pub fn parse(s: &str) -> Result<Self, LocationError> {
        let id = s
            .strip_prefix(LOCATION_SCHEME)
            .ok_or_else(|| LocationError::Scheme(s.to_string()))?;
        if id.is_empty() || id.contains('/') {
            return Err(LocationError::MissingId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// The media id this location addresses.
    pub fn id(&self) -> &str {
        &self.0[LOCATION_SCHEME.len()..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata plus location for one audio item. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    id: String,
    title: String,
    artist: String,
    duration_ms: u64,
    location: Location,
}

impl Track {
    /// Build a track whose location is derived from `id`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        let id = id.into();
        let location = Location::for_id(&id);
        Self::from_parts(id, title.into(), artist.into(), duration_ms, location)
    }

    pub(crate) fn from_parts(
        id: String,
        title: String,
        artist: String,
        duration_ms: u64,
        location: Location,
    ) -> Self {
        Self {
            id,
            title,
            artist,
            duration_ms,
            location,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// One row of the media index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration_ms: u64,
    pub is_music: bool,
    pub is_alarm: bool,
    pub is_ringtone: bool,
    pub path: PathBuf,
}

/// Raw embedded picture bytes as stored in the file's tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub mime: Option<String>,
    pub data: Vec<u8>,
}
