//! Single-deadline debouncer for bursts of resize notifications.
//!
//! The debouncer owns one optional deadline. Scheduling replaces whatever
//! was pending, so only the last signal of a burst fires. Cancelling goes
//! through the same deadline, which makes teardown and re-scheduling the
//! same operation on the same resource.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::utils::clock::Clock;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
    clock: Arc<dyn Clock>,
}

impl Debouncer {
    pub fn new(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            delay,
            deadline: None,
            clock,
        }
    }

    /// Cancels the pending deadline, if any, and arms a new one.
    pub fn schedule(&mut self) {
        let deadline = self.clock.now() + self.delay;
        if self.deadline.replace(deadline).is_some() {
            log::trace!("Debouncer::schedule: replaced pending deadline");
        }
    }

    /// Drops the pending deadline. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the host should wake up next, for `WaitUntil`-style loops.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once per settled burst, when the deadline
    /// has elapsed. The deadline is consumed when it fires.
    pub fn poll(&mut self) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if self.clock.now() < deadline {
            return false;
        }
        self.deadline = None;
        true
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if self.cancel() {
            log::debug!("Debouncer::drop: cancelled pending deadline");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;

    fn debouncer(clock: &Arc<ManualClock>) -> Debouncer {
        Debouncer::new(Duration::from_millis(250), clock.clone())
    }

    #[test]
    fn test_fires_once_after_delay() {
        let clock = Arc::new(ManualClock::new());
        let mut debouncer = debouncer(&clock);

        debouncer.schedule();
        clock.advance(Duration::from_millis(249));
        assert!(!debouncer.poll());

        clock.advance(Duration::from_millis(1));
        assert!(debouncer.poll());
        assert!(!debouncer.poll());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_burst_collapses_to_last_signal() {
        let clock = Arc::new(ManualClock::new());
        let mut debouncer = debouncer(&clock);

        let mut fired = 0;
        for _ in 0..10 {
            debouncer.schedule();
            clock.advance(Duration::from_millis(100));
            if debouncer.poll() {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);

        clock.advance(Duration::from_millis(150));
        if debouncer.poll() {
            fired += 1;
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let clock = Arc::new(ManualClock::new());
        let mut debouncer = debouncer(&clock);

        assert!(!debouncer.cancel());
        debouncer.schedule();
        assert!(debouncer.cancel());
        clock.advance(Duration::from_secs(1));
        assert!(!debouncer.poll());
        assert_eq!(debouncer.next_deadline(), None);
    }

    #[test]
    fn test_next_deadline_tracks_latest_schedule() {
        let clock = Arc::new(ManualClock::new());
        let mut debouncer = debouncer(&clock);

        let start = clock.now();
        debouncer.schedule();
        clock.advance(Duration::from_millis(40));
        debouncer.schedule();
        assert_eq!(
            debouncer.next_deadline(),
            Some(start + Duration::from_millis(290))
        );
    }
}
