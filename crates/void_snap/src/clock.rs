//! Time sources for the stability delay

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

/// Monotonic clock in seconds
pub trait SnapClock: Send + Sync {
    fn now(&self) -> f64;
}

/// Real time since construction
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapClock for MonotonicClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Settable clock shared between a driver and its consumers
///
/// Clones observe the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            time: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, seconds: f64) {
        let mut time = self.time.lock();
        debug_assert!(seconds >= *time, "ManualClock must not run backwards");
        *time = seconds;
    }

    pub fn advance(&self, seconds: f64) {
        *self.time.lock() += seconds;
    }
}

impl SnapClock for ManualClock {
    fn now(&self) -> f64 {
        *self.time.lock()
    }
}
