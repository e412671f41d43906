//! Application model types: `App` and `Screen`.

use crate::library::Track;
use crate::presenter::TrackListPresenter;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    List,
    Player,
}

/// The main application model.
pub struct App {
    pub presenter: TrackListPresenter,
    pub selected: usize,
    pub screen: Screen,
    /// Persistent message shown in place of the list (e.g. access denied).
    pub notice: Option<String>,
    /// One-line feedback in the footer, replaced by the next action.
    pub status: Option<String>,
    pub current_dir: Option<String>,
}

impl App {
    pub fn new(presenter: TrackListPresenter) -> Self {
        Self {
            presenter,
            selected: 0,
            screen: Screen::List,
            notice: None,
            status: None,
            current_dir: None,
        }
    }

    /// An app that shows `notice` and has nothing to list.
    pub fn with_notice(notice: impl Into<String>) -> Self {
        let mut app = Self::new(TrackListPresenter::default());
        app.notice = Some(notice.into());
        app
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn has_tracks(&self) -> bool {
        !self.presenter.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        self.presenter.tracks()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.presenter.tracks().get(self.selected)
    }

    /// Select `idx`, clamped to the list.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.presenter.len().saturating_sub(1));
    }

    /// Move the selection down one row, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.presenter.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the selection up one row, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.presenter.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.presenter.len().saturating_sub(1);
    }

    pub fn show_player(&mut self) {
        self.screen = Screen::Player;
    }

    pub fn show_list(&mut self) {
        self.screen = Screen::List;
    }
}
