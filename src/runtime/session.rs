use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::app::App;
use crate::audio::{DecodeError, MediaDecoder};
use crate::library::MediaStore;
use crate::player::{Direction, Transport, TransportSettings, TransportState};
use crate::service::{BackgroundPlayback, BackgroundStatus, Owner, PlaybackArbiter};
use crate::transfer::PlayerLaunch;

pub type DecoderFactory<D> = Box<dyn FnMut() -> Result<D, DecodeError>>;

/// Everything that can make sound, and the arbiter between them.
pub struct Session<D: MediaDecoder> {
    store: Arc<dyn MediaStore>,
    make_decoder: DecoderFactory<D>,
    transport_settings: TransportSettings,
    scrub_seconds: i64,
    background: BackgroundPlayback,
    arbiter: PlaybackArbiter,
    player: Option<Transport<D>>,
}

impl<D: MediaDecoder> Session<D> {
    pub fn new(
        store: Arc<dyn MediaStore>,
        make_decoder: DecoderFactory<D>,
        transport_settings: TransportSettings,
        scrub_seconds: u64,
        background: BackgroundPlayback,
        arbiter: PlaybackArbiter,
    ) -> Self {
        Self {
            store,
            make_decoder,
            transport_settings,
            scrub_seconds: i64::try_from(scrub_seconds).unwrap_or(i64::MAX),
            background,
            arbiter,
            player: None,
        }
    }

    pub fn player(&self) -> Option<&Transport<D>> {
        self.player.as_ref()
    }

    pub fn background(&self) -> BackgroundStatus {
        self.background.status()
    }

    #[cfg(test)]
    pub fn arbiter(&self) -> &PlaybackArbiter {
        &self.arbiter
    }

    fn claim(&mut self, owner: Owner, now: Instant) {
        match self.arbiter.claim(owner) {
            Some(Owner::Background) => {
                info!("stopping background playback for the player");
                self.background.stop();
            }
            Some(Owner::Player) => {
                if let Some(player) = self.player.as_mut() {
                    player.pause(now);
                }
            }
            None => {}
        }
    }

    /// Drop claims whose owner has gone quiet on its own.
    fn release_idle_owners(&mut self) {
        let player_sounding = self.player.as_ref().is_some_and(|p| {
            matches!(
                p.state(),
                TransportState::Playing | TransportState::Preparing
            )
        });
        if self.arbiter.holds(Owner::Player) && !player_sounding {
            debug!("player went quiet, releasing its claim");
            self.arbiter.release(Owner::Player);
        }
        if self.arbiter.holds(Owner::Background) && self.background.finished() {
            debug!("background track ended, releasing its claim");
            self.arbiter.release(Owner::Background);
        }
    }

    /// Build the launch bundle for the selected row and open the player on it.
    pub fn open_player(&mut self, app: &mut App, now: Instant) {
        let store = Arc::clone(&self.store);
        let Some(extras) = app.presenter.activate(app.selected, |track| {
            let thumbnail = store.artwork(track.location()).map(|a| a.data);
            PlayerLaunch::for_track(track, app.presenter.tracks(), thumbnail).into_extras()
        }) else {
            return;
        };

        let launch = match PlayerLaunch::from_extras(&extras) {
            Ok(launch) => launch,
            Err(e) => {
                error!(error = %e, "malformed player launch");
                app.set_status("Could not open the player");
                return;
            }
        };

        // The previous player releases its decoder before the next one opens.
        self.player = None;
        let decoder = match (self.make_decoder)() {
            Ok(decoder) => decoder,
            Err(e) => {
                error!(error = %e, "no decoder for the player");
                app.set_status(e.to_string());
                return;
            }
        };

        self.claim(Owner::Player, now);
        self.player = Some(Transport::new(
            launch,
            decoder,
            Arc::clone(&self.store),
            &self.transport_settings,
        ));
        app.status = None;
        app.show_player();
    }

    pub fn close_player(&mut self, app: &mut App) {
        if let Some(player) = self.player.take() {
            app.set_selected(player.current());
        }
        self.arbiter.release(Owner::Player);
        app.show_list();
    }

    pub fn toggle(&mut self, now: Instant) {
        let resuming = self
            .player
            .as_ref()
            .is_some_and(|p| p.state() == TransportState::Paused);
        if resuming {
            self.claim(Owner::Player, now);
        }
        if let Some(player) = self.player.as_mut() {
            player.play_toggle(now);
        }
        self.release_idle_owners();
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(player) = self.player.as_mut() {
            player.pause(now);
        }
        self.release_idle_owners();
    }

    pub fn advance(&mut self, direction: Direction, now: Instant) {
        if self.player.is_none() {
            return;
        }
        self.claim(Owner::Player, now);
        if let Some(player) = self.player.as_mut() {
            player.advance(direction);
        }
    }

    /// Keyboard scrub by the configured step, backwards when `forward` is false.
    pub fn scrub(&mut self, forward: bool, now: Instant) {
        let delta = if forward {
            self.scrub_seconds
        } else {
            -self.scrub_seconds
        };
        if let Some(player) = self.player.as_mut() {
            player.scrub(delta, now);
        }
    }

    pub fn play_in_background(&mut self, app: &mut App, now: Instant) {
        let Some(track) = app.selected_track().cloned() else {
            return;
        };
        self.claim(Owner::Background, now);
        self.background.play(track.location());
        app.set_status(format!("Background: {}", track.title()));
    }

    pub fn stop_background(&mut self, app: &mut App) {
        self.background.stop();
        self.arbiter.release(Owner::Background);
        app.set_status("Background stopped");
    }

    pub fn pump(&mut self, now: Instant) {
        if let Some(player) = self.player.as_mut() {
            player.pump(now);
        }
        self.release_idle_owners();
    }

    pub fn shutdown(&mut self) {
        self.player = None;
        self.background.shutdown();
    }
}
