use std::env;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::audio::{DecodeError, RodioDecoder, open_output};
use crate::mpris::ControlCmd;
use crate::player::TransportSettings;
use crate::service::{BackgroundPlayback, PlaybackArbiter};

mod event_loop;
mod logging;
mod session;
mod settings;
mod startup;


fn music_dir() -> PathBuf {
    env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();
    let _log_guard = logging::init(&settings.logging);
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let dir = music_dir();
    info!(dir = %dir.display(), "starting musicverse");

    let startup::Library { mut app, store } = startup::open_library(&dir, &settings.library);
    app.set_current_dir(dir.display().to_string());

    // The stream must outlive every decoder playing through its mixer.
    let stream = match open_output() {
        Ok(stream) => Some(stream),
        Err(e) => {
            error!(error = %e, "player screen will be unavailable");
            None
        }
    };
    let mixer = stream.as_ref().map(|s| s.mixer().clone());
    let volume = settings.audio.volume;
    let decoder_store = Arc::clone(&store);
    let make_decoder = move || match &mixer {
        Some(mixer) => Ok(RodioDecoder::new(
            mixer.clone(),
            Arc::clone(&decoder_store),
            volume,
        )),
        None => Err(DecodeError::Output("no audio output device".to_string())),
    };

    let arbiter = PlaybackArbiter::new(settings.playback.arbitration.into());
    info!(policy = ?arbiter.policy(), "playback arbitration");
    let mut session = session::Session::new(
        Arc::clone(&store),
        Box::new(make_decoder),
        TransportSettings::from_settings(&settings),
        settings.controls.scrub_seconds,
        BackgroundPlayback::start(Arc::clone(&store), volume),
        arbiter,
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut session,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    session.shutdown();
    drop(stream);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    info!("bye");
    run_result
}
