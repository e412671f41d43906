use std::time::{Duration, Instant};

const FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];

/// Continuous rotation of the artwork indicator.
///
/// Stopping freezes the current angle; starting again continues from it.
#[derive(Debug, Clone)]
pub struct Spinner {
    period: Duration,
    started_at: Option<Instant>,
    base_degrees: f64,
}

impl Spinner {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            started_at: None,
            base_degrees: 0.0,
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn stop(&mut self, now: Instant) {
        self.base_degrees = self.angle(now);
        self.started_at = None;
    }

    /// Stop and return to the initial orientation.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.base_degrees = 0.0;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Current rotation in degrees, in `[0, 360)`.
    pub fn angle(&self, now: Instant) -> f64 {
        let turned = match self.started_at {
            Some(st) if !self.period.is_zero() => {
                now.saturating_duration_since(st).as_secs_f64() / self.period.as_secs_f64() * 360.0
            }
            _ => 0.0,
        };
        (self.base_degrees + turned) % 360.0
    }

    pub fn glyph(&self, now: Instant) -> char {
        let quarter = (self.angle(now) / 90.0) as usize;
        FRAMES[quarter % FRAMES.len()]
    }
}
