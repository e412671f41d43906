//! Now-playing notification and media-key control over MPRIS.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, info, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::player::TransportState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.musicverse";
const NOTIFY_POLL: Duration = Duration::from_millis(200);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl From<TransportState> for PlaybackStatus {
    fn from(state: TransportState) -> Self {
        match state {
            TransportState::Idle => PlaybackStatus::Stopped,
            TransportState::Preparing | TransportState::Playing => PlaybackStatus::Playing,
            TransportState::Paused => PlaybackStatus::Paused,
        }
    }
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackStatus,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<ObjectPath<'static>>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackStatus) {
        if let Ok(mut s) = self.state.lock() {
            if s.playback == playback {
                return;
            }
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Publish `track` as now playing, or clear the metadata with `None`.
    pub fn set_track_metadata(&self, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(track) => {
                    s.title = Some(track.title().to_string());
                    s.artist = vec![track.artist().to_string()];
                    s.url = Some(track.location().to_string());
                    s.length_micros = i64::try_from(track.duration_ms())
                        .ok()
                        .map(|ms| ms.saturating_mul(1000));
                    s.track_id =
                        ObjectPath::try_from(format!("{OBJECT_PATH}/track/{}", track.id())).ok();
                }
                None => {
                    s.title = None;
                    s.artist.clear();
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "musicverse"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let entries = [
            ("mpris:trackid", s.track_id.clone().map(Value::from)),
            ("xesam:title", s.title.clone().map(Value::from)),
            (
                "xesam:artist",
                (!s.artist.is_empty()).then(|| Value::from(s.artist.clone())),
            ),
            ("xesam:url", s.url.clone().map(Value::from)),
            ("mpris:length", s.length_micros.map(Value::from)),
        ];
        for (key, value) in entries {
            if let Some(value) = value.and_then(owned) {
                map.insert(key.to_string(), value);
            }
        }
        map
    }
}

async fn emit_changes(player: &InterfaceRef<PlayerIface>) {
    let iface = player.get().await;
    let emitter = player.signal_emitter();
    if let Err(e) = iface.playback_status_changed(emitter).await {
        debug!(error = %e, "MPRIS: failed to signal playback status");
    }
    if let Err(e) = iface.metadata_changed(emitter).await {
        debug!(error = %e, "MPRIS: failed to signal metadata");
    }
}

async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>, notify: Receiver<()>) {
    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "MPRIS: failed to connect to session bus");
            return;
        }
    };

    if let Err(e) = connection.request_name(BUS_NAME).await {
        warn!(error = %e, "MPRIS: failed to acquire name");
        return;
    }

    let object_server = connection.object_server();

    if let Err(e) = object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await
    {
        warn!(error = %e, "MPRIS: failed to register root iface");
        return;
    }

    if let Err(e) = object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await
    {
        warn!(error = %e, "MPRIS: failed to register player iface");
        return;
    }

    let player = match object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await
    {
        Ok(player) => player,
        Err(e) => {
            warn!(error = %e, "MPRIS: player iface vanished");
            return;
        }
    };
    info!(name = BUS_NAME, "MPRIS ready");

    loop {
        Timer::after(NOTIFY_POLL).await;
        let mut changed = false;
        loop {
            match notify.try_recv() {
                Ok(()) => changed = true,
                Err(mpsc::TryRecvError::Empty) => break,
                // The app is gone; nobody will update the state again.
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }
        if changed {
            emit_changes(&player).await;
        }
    }
}

/// Register on the session bus from a background thread. Failures are logged
/// and leave the returned handle inert.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(serve(tx, state_for_thread, notify_rx));
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}
