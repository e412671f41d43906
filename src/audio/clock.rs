use std::time::{Duration, Instant};

/// Wall-clock playback position: time accumulated across pauses plus the
/// running stretch since the last resume.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlayClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlayClock {
    pub fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    /// Jump to `position`, keeping the running/paused state.
    pub fn set(&mut self, position: Duration, now: Instant) {
        self.accumulated = position;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
