//! Time sources
//!
//! Everything that compares against "now" (cache expiry, rate limiting,
//! session creation) takes a [`Clock`] so tests can pin time.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as epoch milliseconds
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Build from epoch milliseconds, falling back to the epoch itself
    /// for out-of-range input
    pub fn from_millis(millis: i64) -> Self {
        Self::new(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::from_millis(1_000);
        assert_eq!(clock.now_millis(), 1_000);

        clock.advance(Duration::seconds(2));
        assert_eq!(clock.now_millis(), 3_000);
    }

    #[test]
    fn test_clock_by_reference() {
        let clock = FixedClock::from_millis(42);
        let by_ref: &FixedClock = &clock;
        assert_eq!(Clock::now_millis(&by_ref), 42);
    }
}
