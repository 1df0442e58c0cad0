/// Elapsed-time queries against the simulation clock.
///
/// Timers never tick themselves. The owner advances a shared clock and asks
/// each timer how long ago it was restarted, the same way a wall-clock
/// stopwatch would be queried, but deterministic under test.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timer {
    started_at: f64,
}

impl Timer {
    pub fn started(now: f64) -> Self {
        Self { started_at: now }
    }

    pub fn restart(&mut self, now: f64) {
        self.started_at = now;
    }

    /// Seconds since the last restart. Never negative.
    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.started_at).max(0.0) as f32
    }
}
