// Path: crates/telemetry/src/time.rs
use std::time::{Duration, Instant};

/// Logs the time between its creation and its drop.
pub struct Timer {
    what: String,
    start: Instant,
}

impl Timer {
    /// Starts timing `what`.
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            start: Instant::now(),
        }
    }

    /// Time since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        tracing::info!(
            target: "gauntlet",
            command = %self.what,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "finished"
        );
    }
}
