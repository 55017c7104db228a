//! Time sources for the resize debounce.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::time::{Duration, Instant};

pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time, for hosts that wait with [`crate::Filmstrip::settle`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that stands still until advanced.
///
/// Scenario replay and tests step it across debounce deadlines, so the
/// outcome of a resize burst never depends on thread scheduling.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Total time advanced since creation.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}
