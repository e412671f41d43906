use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Screen};
use crate::audio::MediaDecoder;
use crate::config;
use crate::library::{Location, Track};
use crate::mpris::{ControlCmd, MprisHandle, PlaybackStatus};
use crate::player::{Direction, TransportState};
use crate::ui;

use super::session::Session;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last now-playing snapshot published to MPRIS.
    last_mpris: Option<(Option<Location>, PlaybackStatus)>,
}

/// Main terminal event loop: handles input, decoder events, drawing and
/// MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run<D: MediaDecoder>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session<D>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        session.pump(Instant::now());
        sync_mpris(mpris, app, session, state);

        let now = Instant::now();
        let background = session.background();
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                session.player(),
                &background,
                &settings.ui,
                &settings.controls,
                now,
            )
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, session, Instant::now()) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, session, state, Instant::now()) {
                    return Ok(());
                }
            }
        }
    }
}

fn now_playing<D: MediaDecoder>(app: &App, session: &Session<D>) -> (Option<Track>, PlaybackStatus) {
    if let Some(player) = session.player() {
        let track = player.current_track().cloned().or_else(|| {
            app.tracks()
                .iter()
                .find(|t| t.location() == player.location())
                .cloned()
        });
        return (track, player.state().into());
    }
    let background = session.background();
    let track = background
        .location
        .as_ref()
        .and_then(|l| app.tracks().iter().find(|t| t.location() == l).cloned());
    let status = if background.playing {
        PlaybackStatus::Playing
    } else {
        PlaybackStatus::Stopped
    };
    (track, status)
}

fn sync_mpris<D: MediaDecoder>(
    mpris: &MprisHandle,
    app: &App,
    session: &Session<D>,
    state: &mut EventLoopState,
) {
    let (track, status) = now_playing(app, session);
    let snapshot = (track.as_ref().map(|t| t.location().clone()), status);
    if state.last_mpris.as_ref() == Some(&snapshot) {
        return;
    }
    mpris.set_track_metadata(track.as_ref());
    mpris.set_playback(status);
    state.last_mpris = Some(snapshot);
}

/// Apply a media-key command. Returns true when the app should quit.
pub(super) fn handle_control_cmd<D: MediaDecoder>(
    cmd: ControlCmd,
    app: &mut App,
    session: &mut Session<D>,
    now: Instant,
) -> bool {
    let player_state = session.player().map(|p| p.state());
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => match player_state {
            Some(TransportState::Paused) => session.toggle(now),
            Some(_) => {}
            None => session.open_player(app, now),
        },
        ControlCmd::Pause => session.pause(now),
        ControlCmd::PlayPause => match player_state {
            Some(_) => session.toggle(now),
            None => session.open_player(app, now),
        },
        ControlCmd::Stop => {
            if player_state.is_some() {
                session.close_player(app);
            }
        }
        ControlCmd::Next => session.advance(Direction::Next, now),
        ControlCmd::Prev => session.advance(Direction::Previous, now),
    }
    false
}

/// Apply a key press. Returns true when the app should quit.
pub(super) fn handle_key_event<D: MediaDecoder>(
    key: KeyEvent,
    app: &mut App,
    session: &mut Session<D>,
    state: &mut EventLoopState,
    now: Instant,
) -> bool {
    if key.code == KeyCode::Char('q') {
        return true;
    }
    let pending_gg = std::mem::take(&mut state.pending_gg);

    match app.screen {
        Screen::List => match key.code {
            KeyCode::Char('g') => {
                if pending_gg {
                    app.select_first();
                } else {
                    state.pending_gg = true;
                }
            }
            KeyCode::Char('G') => app.select_last(),
            KeyCode::Char('j') | KeyCode::Down => app.next(),
            KeyCode::Char('k') | KeyCode::Up => app.prev(),
            KeyCode::Enter => session.open_player(app, now),
            KeyCode::Char('b') => session.play_in_background(app, now),
            KeyCode::Char('B') => session.stop_background(app),
            _ => {}
        },
        Screen::Player => match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') => session.toggle(now),
            KeyCode::Char('l') | KeyCode::Right => session.advance(Direction::Next, now),
            KeyCode::Char('h') | KeyCode::Left => session.advance(Direction::Previous, now),
            KeyCode::Char('L') => session.scrub(true, now),
            KeyCode::Char('H') => session.scrub(false, now),
            KeyCode::Esc | KeyCode::Backspace => session.close_player(app),
            _ => {}
        },
    }
    false
}
