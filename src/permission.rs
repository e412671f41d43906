//! Read access to the music directory.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

pub const DENIED_NOTICE: &str = "Storage permission required to display music files.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied(String),
}

/// Only a permission error counts as denied. Any other failure (missing
/// directory, not a directory) is left for the media index to report as an
/// unavailable library.
pub fn check_access(dir: &Path) -> Access {
    match fs::read_dir(dir) {
        Ok(_) => Access::Granted,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            warn!(dir = %dir.display(), error = %e, "no read access to music directory");
            Access::Denied(e.to_string())
        }
        Err(_) => Access::Granted,
    }
}
