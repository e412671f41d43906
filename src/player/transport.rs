use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::audio::{DecoderEvent, Generation, MediaDecoder};
use crate::config::Settings;
use crate::library::{Artwork, Location, MediaStore, Track, duration_ms, format_mmss};
use crate::transfer::PlayerLaunch;

use super::seek::SeekBar;
use super::spinner::Spinner;
use super::ticker::Ticker;
use super::view::{NowPlaying, TransportState};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub tick_interval: Duration,
    pub rotation_period: Duration,
    pub auto_advance: bool,
}

impl TransportSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tick_interval: Duration::from_millis(settings.ui.tick_interval_ms),
            rotation_period: Duration::from_millis(settings.ui.rotation_period_ms),
            auto_advance: settings.playback.auto_advance,
        }
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// The player screen's playback state machine.
///
/// Owns one decoder and a private copy of the track list. Decoder events are
/// delivered through `pump`, which also drives the refresh tick; every event
/// carrying a generation other than the latest `load` is dropped.
pub struct Transport<D: MediaDecoder> {
    decoder: D,
    store: Arc<dyn MediaStore>,
    tracks: Vec<Track>,
    current: usize,
    location: Location,
    generation: Generation,
    state: TransportState,
    seek_bar: SeekBar,
    ticker: Ticker,
    spinner: Spinner,
    now_playing: NowPlaying,
    auto_advance: bool,
}

impl<D: MediaDecoder> Transport<D> {
    /// Start preparing the launched track. The cursor points at it when it is
    /// part of the list and at the first entry otherwise.
    pub fn new(
        launch: PlayerLaunch,
        decoder: D,
        store: Arc<dyn MediaStore>,
        settings: &TransportSettings,
    ) -> Self {
        let current = launch
            .tracks
            .iter()
            .position(|t| t.location() == &launch.location)
            .unwrap_or(0);
        let artwork = launch.thumbnail.map(|data| Artwork { mime: None, data });

        let mut transport = Self {
            decoder,
            store,
            tracks: launch.tracks,
            current,
            location: launch.location.clone(),
            generation: Generation::default(),
            state: TransportState::Idle,
            seek_bar: SeekBar::default(),
            ticker: Ticker::new(settings.tick_interval),
            spinner: Spinner::new(settings.rotation_period),
            now_playing: NowPlaying::new(&launch.title, &launch.artist, artwork),
            auto_advance: settings.auto_advance,
        };
        transport.load(&launch.location);
        transport
    }

    /// Abandon whatever is loaded and begin preparing `location`.
    pub fn load(&mut self, location: &Location) {
        self.generation = self.generation.next();
        self.ticker.cancel();
        self.spinner.reset();
        self.seek_bar = SeekBar::default();
        self.now_playing.elapsed_label = format_mmss(0);
        self.now_playing.total_label.clear();
        self.location = location.clone();

        self.decoder.reset();
        match self.decoder.load(location, self.generation) {
            Ok(()) => {
                debug!(%location, generation = self.generation.get(), "preparing track");
                self.state = TransportState::Preparing;
            }
            Err(e) => {
                error!(%location, error = %e, "failed to set up decoder");
                self.state = TransportState::Idle;
            }
        }
    }

    /// Apply pending decoder events, then fire the refresh tick if it is due.
    pub fn pump(&mut self, now: Instant) {
        while let Some(event) = self.decoder.poll_event() {
            self.handle_event(event, now);
        }
        if self.state == TransportState::Playing && self.ticker.fire_if_due(now) {
            self.refresh_position();
        }
    }

    fn handle_event(&mut self, event: DecoderEvent, now: Instant) {
        if event.generation() != self.generation {
            debug!(
                stale = event.generation().get(),
                current = self.generation.get(),
                "discarding decoder event for an abandoned load"
            );
            return;
        }
        match event {
            DecoderEvent::Prepared { duration, .. } => self.on_prepared(duration, now),
            DecoderEvent::Completed { .. } => self.on_completed(now),
            DecoderEvent::Failed { error, .. } => {
                error!(location = %self.location, %error, "failed to prepare track");
                self.ticker.cancel();
                self.spinner.reset();
                self.state = TransportState::Idle;
            }
        }
    }

    fn on_prepared(&mut self, duration: Duration, now: Instant) {
        self.seek_bar.set_max(duration);
        self.now_playing.total_label = format_mmss(duration_ms(duration));
        self.decoder.start();
        self.state = TransportState::Playing;
        self.refresh_position();
        self.ticker.schedule(now);
        self.spinner.start(now);
        info!(title = %self.now_playing.title, "playing");
    }

    fn on_completed(&mut self, now: Instant) {
        self.ticker.cancel();
        self.spinner.stop(now);
        self.state = TransportState::Paused;
        self.seek_bar.set_progress(self.seek_bar.max());
        self.now_playing.elapsed_label = self.now_playing.total_label.clone();
        if self.auto_advance {
            self.advance(Direction::Next);
        }
    }

    fn refresh_position(&mut self) {
        let position = self.decoder.position();
        self.seek_bar.set_progress(position);
        self.now_playing.elapsed_label = format_mmss(duration_ms(self.seek_bar.progress()));
    }

    pub fn play_toggle(&mut self, now: Instant) {
        match self.state {
            TransportState::Playing => self.pause(now),
            TransportState::Paused => {
                self.decoder.start();
                self.state = TransportState::Playing;
                self.refresh_position();
                self.ticker.schedule(now);
                self.spinner.start(now);
            }
            TransportState::Idle | TransportState::Preparing => {}
        }
    }

    /// Pause if playing; used when another player takes over the output.
    pub fn pause(&mut self, now: Instant) {
        if self.state != TransportState::Playing {
            return;
        }
        self.decoder.pause();
        self.state = TransportState::Paused;
        self.ticker.cancel();
        self.spinner.stop(now);
    }

    /// The user grabbed the seek control.
    pub fn begin_seek(&mut self) {
        self.seek_bar.begin_tracking();
        self.ticker.cancel();
    }

    /// User seek while the control is held: clamps to the track length and
    /// forwards to the decoder.
    pub fn seek(&mut self, position: Duration) {
        if !self.seek_bar.is_tracking()
            || matches!(self.state, TransportState::Idle | TransportState::Preparing)
        {
            return;
        }
        let position = self.seek_bar.drag_to(position);
        self.decoder.seek_to(position);
        self.now_playing.elapsed_label = format_mmss(duration_ms(position));
    }

    /// The user released the seek control.
    pub fn end_seek(&mut self, now: Instant) {
        self.seek_bar.end_tracking();
        if self.state == TransportState::Playing {
            self.ticker.schedule(now);
        }
    }

    /// Keyboard seek relative to the current position.
    pub fn scrub(&mut self, delta_secs: i64, now: Instant) {
        if !matches!(self.state, TransportState::Playing | TransportState::Paused) {
            return;
        }
        let delta = Duration::from_secs(delta_secs.unsigned_abs());
        let progress = self.seek_bar.progress();
        let target = if delta_secs >= 0 {
            progress.saturating_add(delta)
        } else {
            progress.saturating_sub(delta)
        };
        self.begin_seek();
        self.seek(target);
        self.end_seek(now);
    }

    /// Step the cursor with wraparound and load the track under it.
    pub fn advance(&mut self, direction: Direction) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        self.current = match direction {
            Direction::Next => (self.current + 1) % len,
            Direction::Previous => (self.current + len - 1) % len,
        };
        let track = self.tracks[self.current].clone();
        let artwork = self.store.artwork(track.location());
        if artwork.is_none() {
            debug!(id = track.id(), "no artwork");
        }
        self.now_playing = NowPlaying::new(track.title(), track.artist(), artwork);
        self.load(track.location());
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    #[cfg(test)]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    pub fn seek_bar(&self) -> &SeekBar {
        &self.seek_bar
    }

    #[cfg(test)]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_scheduled()
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }
}

impl<D: MediaDecoder> Drop for Transport<D> {
    fn drop(&mut self) {
        self.ticker.cancel();
        self.spinner.reset();
        self.decoder.release();
        debug!(location = %self.location, "player released");
    }
}
