use std::path::Path;

use lofty::picture::PictureType;
use lofty::prelude::*;
use tracing::debug;

use super::model::Artwork;

/// Extract the embedded picture from the file at `path`.
///
/// Prefers the front cover and falls back to whatever picture comes first.
/// Unreadable files and files without pictures yield `None`.
pub fn read_artwork(path: &Path) -> Option<Artwork> {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags for artwork");
            return None;
        }
    };

    let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
    let pictures = tag.pictures();
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())?;

    Some(Artwork {
        mime: picture.mime_type().map(|m| m.as_str().to_string()),
        data: picture.data().to_vec(),
    })
}
