use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use lofty::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{IndexRow, Location, UNKNOWN_ARTIST};
use super::{LibraryError, MediaStore};

/// Media index built by walking a music directory.
pub struct FsMediaIndex {
    rows: Vec<IndexRow>,
    paths: HashMap<String, PathBuf>,
    with_artwork: HashSet<String>,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Lowercased directory components of `relative`, excluding the file name.
fn parent_dirs(relative: &Path) -> Vec<String> {
    relative
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => s.to_str().map(str::to_lowercase),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn any_named(dirs: &[String], names: &[String]) -> bool {
    dirs.iter()
        .any(|d| names.iter().any(|n| n.trim().eq_ignore_ascii_case(d)))
}

/// Music / alarm / ringtone flags for a file, decided by the directories it
/// lives in relative to the library root.
pub(super) fn classify(relative: &Path, settings: &LibrarySettings) -> (bool, bool, bool) {
    let dirs = parent_dirs(relative);
    let is_alarm = any_named(&dirs, &settings.alarm_dirs);
    let is_ringtone = any_named(&dirs, &settings.ringtone_dirs);
    let is_music = !is_alarm && !is_ringtone && !any_named(&dirs, &settings.non_music_dirs);
    (is_music, is_alarm, is_ringtone)
}

/// Stable id for a file: a hash of its `/`-joined path relative to the root.
pub(super) fn stable_id(relative: &Path) -> String {
    let key: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let hash = blake3::hash(key.join("/").as_bytes());
    hash.to_hex().as_str()[..16].to_string()
}

struct ScannedFile {
    row: IndexRow,
    has_artwork: bool,
}

fn read_file(root: &Path, path: &Path, settings: &LibrarySettings) -> ScannedFile {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = UNKNOWN_ARTIST.to_string();
    let mut duration_ms = 0;
    let mut has_artwork = false;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration_ms = super::duration_ms(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title() {
                    if !v.trim().is_empty() {
                        title = v.trim().to_string();
                    }
                }
                if let Some(v) = tag.artist() {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = v.to_string();
                    }
                }
                has_artwork = !tag.pictures().is_empty();
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "unreadable tags"),
    }

    let (is_music, is_alarm, is_ringtone) = classify(relative, settings);

    ScannedFile {
        row: IndexRow {
            id: stable_id(relative),
            title,
            artist,
            duration_ms,
            is_music,
            is_alarm,
            is_ringtone,
            path: path.to_path_buf(),
        },
        has_artwork,
    }
}

impl FsMediaIndex {
    /// Walk `root` and index every audio file below it.
    pub fn scan(root: &Path, settings: &LibrarySettings) -> Result<Self, LibraryError> {
        let meta = fs::metadata(root).map_err(|source| LibraryError::Unavailable {
            path: root.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(LibraryError::NotADirectory(root.to_path_buf()));
        }

        let mut walker = WalkDir::new(root).follow_links(settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut rows = Vec::new();
        let mut paths = HashMap::new();
        let mut with_artwork = HashSet::new();

        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file()
                || (!settings.include_hidden && is_hidden(path))
                || !is_audio_file(path, settings)
            {
                continue;
            }

            let scanned = read_file(root, path, settings);
            if scanned.has_artwork {
                with_artwork.insert(scanned.row.id.clone());
            }
            paths.insert(scanned.row.id.clone(), scanned.row.path.clone());
            rows.push(scanned.row);
        }

        info!(root = %root.display(), files = rows.len(), "indexed media directory");

        Ok(Self {
            rows,
            paths,
            with_artwork,
        })
    }

    /// An index with no entries, used when the directory could not be scanned.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            paths: HashMap::new(),
            with_artwork: HashSet::new(),
        }
    }
}

impl MediaStore for FsMediaIndex {
    fn query(&self) -> Result<Vec<IndexRow>, LibraryError> {
        Ok(self.rows.clone())
    }

    fn resolve(&self, location: &Location) -> Option<PathBuf> {
        self.paths.get(location.id()).cloned()
    }

    fn has_artwork(&self, location: &Location) -> bool {
        self.with_artwork.contains(location.id())
    }
}
