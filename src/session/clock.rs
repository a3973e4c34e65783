use std::time::{Duration, Instant};

/// Measures active recording time, excluding paused intervals
#[derive(Debug, Clone, Default)]
pub struct RecordingClock {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and start measuring a new session
    pub fn start(&mut self, now: Instant) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(now);
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Freeze the measured length; it stays readable until the next start
    pub fn stop(&mut self, now: Instant) {
        self.pause(now);
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }
}
