//! Trailing-edge throttling for live re-validation.
//!
//! Rapid event bursts (every keystroke fires) must not run the pipeline
//! per event. The throttle is leading-edge disabled: the first submission
//! in a quiet window schedules a fire `interval` later, further
//! submissions within the window only replace the stored context, and the
//! fire consumes whatever context was stored last. One burst, one run,
//! computed from the freshest state.

use parking_lot::Mutex;
use std::time::Duration;

/// What the caller should do after submitting work to the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// No interval configured; run immediately.
    Immediate,
    /// Window opened; sleep this long, then call `fire`.
    Scheduled(Duration),
    /// A fire is already scheduled; the stored context was replaced.
    Coalesced,
}

struct Inner<T> {
    pending: Option<T>,
    scheduled: bool,
}

/// A trailing-edge throttle carrying the latest submitted context.
pub struct Throttle<T> {
    interval: Duration,
    inner: Mutex<Inner<T>>,
}

impl<T> Throttle<T> {
    /// New throttle with the given minimum interval between fires.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            inner: Mutex::new(Inner {
                pending: None,
                scheduled: false,
            }),
        }
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Submit work. The context replaces any stored one.
    pub fn submit(&self, context: T) -> ThrottleDecision {
        if self.interval.is_zero() {
            return ThrottleDecision::Immediate;
        }
        let mut inner = self.inner.lock();
        inner.pending = Some(context);
        if inner.scheduled {
            ThrottleDecision::Coalesced
        } else {
            inner.scheduled = true;
            ThrottleDecision::Scheduled(self.interval)
        }
    }

    /// Consume the stored context and close the window.
    ///
    /// Called once per `Scheduled` decision, after the sleep. `None`
    /// means the window was already consumed or cancelled.
    pub fn fire(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        inner.scheduled = false;
        inner.pending.take()
    }

    /// Drop any stored context and close the window.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        inner.scheduled = false;
        inner.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_is_immediate() {
        let throttle = Throttle::new(Duration::ZERO);
        assert_eq!(throttle.submit("a"), ThrottleDecision::Immediate);
        assert_eq!(throttle.submit("b"), ThrottleDecision::Immediate);
        // Immediate submissions never store context.
        assert_eq!(throttle.fire(), None);
    }

    #[test]
    fn test_burst_coalesces_to_latest() {
        let throttle = Throttle::new(Duration::from_millis(100));
        assert_eq!(
            throttle.submit("a"),
            ThrottleDecision::Scheduled(Duration::from_millis(100))
        );
        assert_eq!(throttle.submit("b"), ThrottleDecision::Coalesced);
        assert_eq!(throttle.submit("c"), ThrottleDecision::Coalesced);

        assert_eq!(throttle.fire(), Some("c"));
        assert_eq!(throttle.fire(), None);
    }

    #[test]
    fn test_window_reopens_after_fire() {
        let throttle = Throttle::new(Duration::from_millis(50));
        assert!(matches!(throttle.submit(1), ThrottleDecision::Scheduled(_)));
        assert_eq!(throttle.fire(), Some(1));
        assert!(matches!(throttle.submit(2), ThrottleDecision::Scheduled(_)));
    }

    #[test]
    fn test_cancel_drops_context() {
        let throttle = Throttle::new(Duration::from_millis(50));
        throttle.submit("a");
        throttle.cancel();
        assert_eq!(throttle.fire(), None);
    }
}
