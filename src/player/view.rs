use crate::library::{Artwork, format_mmss};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Preparing,
    Playing,
    Paused,
}

impl TransportState {
    pub fn label(self) -> &'static str {
        match self {
            TransportState::Idle => "Stopped",
            TransportState::Preparing => "Loading",
            TransportState::Playing => "Playing",
            TransportState::Paused => "Paused",
        }
    }
}

/// What the player screen shows for the loaded track.
#[derive(Debug, Clone, Default)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub artwork: Option<Artwork>,
    pub elapsed_label: String,
    pub total_label: String,
}

impl NowPlaying {
    pub fn new(title: &str, artist: &str, artwork: Option<Artwork>) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            artwork,
            elapsed_label: format_mmss(0),
            total_label: String::new(),
        }
    }
}
