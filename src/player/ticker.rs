use std::time::{Duration, Instant};

/// A cancellable, self-rescheduling deadline polled from the event loop.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Schedule the next firing one period after `now`, replacing any pending
    /// one. A deadline past what `Instant` can represent leaves it cancelled.
    pub fn schedule(&mut self, now: Instant) {
        self.next_due = now.checked_add(self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    #[cfg(test)]
    pub fn is_scheduled(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true when the tick was due; it is then rescheduled from `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.schedule(now);
                true
            }
            _ => false,
        }
    }
}
