use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::App;
use crate::config::LibrarySettings;
use crate::library::{FsMediaIndex, MediaStore, load_tracks};
use crate::permission::{Access, DENIED_NOTICE, check_access};
use crate::presenter::TrackListPresenter;

pub struct Library {
    pub app: App,
    pub store: Arc<dyn MediaStore>,
}

/// Check access, index `dir` and bind the ordered list. A denied directory is
/// never scanned; an unreadable one yields an empty list.
pub fn open_library(dir: &Path, settings: &LibrarySettings) -> Library {
    if let Access::Denied(reason) = check_access(dir) {
        info!(%reason, "music directory not readable, showing notice");
        return Library {
            app: App::with_notice(DENIED_NOTICE),
            store: Arc::new(FsMediaIndex::empty()),
        };
    }

    let index = FsMediaIndex::scan(dir, settings).unwrap_or_else(|e| {
        warn!(error = %e, "media index unavailable");
        FsMediaIndex::empty()
    });
    let store: Arc<dyn MediaStore> = Arc::new(index);
    let tracks = load_tracks(store.as_ref());
    let presenter = TrackListPresenter::new(tracks, store.as_ref());

    Library {
        app: App::new(presenter),
        store,
    }
}
