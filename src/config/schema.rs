use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/musicverse/config.toml` or `~/.config/musicverse/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSICVERSE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Output volume for both players, `0.0..=1.0`.
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How often the player screen polls the playback position (milliseconds).
    pub tick_interval_ms: u64,
    /// Time for one full turn of the artwork indicator (milliseconds).
    pub rotation_period_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ musicverse ~ ".to_string(),
            tick_interval_ms: 1000,
            rotation_period_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Move to the next track when the current one finishes.
    pub auto_advance: bool,
    /// Whether the player screen and the background player may sound at once.
    pub arbitration: ArbitrationSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            arbitration: ArbitrationSetting::Exclusive,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArbitrationSetting {
    #[serde(alias = "single", alias = "one-at-a-time")]
    Exclusive,
    #[serde(alias = "both", alias = "simultaneous")]
    Independent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Directory names whose files are alarms.
    pub alarm_dirs: Vec<String>,
    /// Directory names whose files are ringtones.
    pub ringtone_dirs: Vec<String>,
    /// Directory names whose files are audio but not music.
    pub non_music_dirs: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            alarm_dirs: vec!["alarms".into()],
            ringtone_dirs: vec!["ringtones".into()],
            non_music_dirs: vec![
                "notifications".into(),
                "podcasts".into(),
                "audiobooks".into(),
                "recordings".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `MUSICVERSE_LOG` is unset.
    pub level: String,
    /// Log file; defaults to `$XDG_STATE_HOME/musicverse/musicverse.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
