use std::time::Duration;

/// State of the seek control.
///
/// `set_progress` is the programmatic path used by the refresh tick and never
/// leads to a decoder seek; `drag_to` is the user path.
#[derive(Debug, Clone, Default)]
pub struct SeekBar {
    max: Duration,
    progress: Duration,
    tracking: bool,
}

impl SeekBar {
    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn set_max(&mut self, max: Duration) {
        self.max = max;
        self.progress = self.progress.min(max);
    }

    pub fn progress(&self) -> Duration {
        self.progress
    }

    pub fn set_progress(&mut self, progress: Duration) {
        self.progress = progress.min(self.max);
    }

    /// Move the thumb as the user would; returns the clamped position.
    pub fn drag_to(&mut self, position: Duration) -> Duration {
        self.progress = position.min(self.max);
        self.progress
    }

    pub fn begin_tracking(&mut self) {
        self.tracking = true;
    }

    pub fn end_tracking(&mut self) {
        self.tracking = false;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Fraction of the track played, for gauges.
    pub fn ratio(&self) -> f64 {
        if self.max.is_zero() {
            return 0.0;
        }
        (self.progress.as_secs_f64() / self.max.as_secs_f64()).clamp(0.0, 1.0)
    }
}
