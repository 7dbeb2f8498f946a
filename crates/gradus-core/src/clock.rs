//! # Clock
//!
//! Time is an injected effect: every timestamp the ledger writes comes
//! from a [`Clock`] handed in at construction, never from an ambient
//! global. Tests use [`FixedClock`] to make transitions reproducible.

use crate::Timestamp;

/// Source of "now" for ledger transitions.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall-clock time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(chrono::Utc::now().timestamp_millis())
    }
}

/// A settable clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::atomic::AtomicI64,
}

impl FixedClock {
    /// Create a fixed clock at the given time.
    #[must_use]
    pub fn at(ts: Timestamp) -> Self {
        Self {
            now: std::sync::atomic::AtomicI64::new(ts.millis()),
        }
    }

    /// Move the clock to a new time.
    pub fn set(&self, ts: Timestamp) {
        self.now
            .store(ts.millis(), std::sync::atomic::Ordering::SeqCst);
    }

    /// Advance the clock by whole days.
    pub fn advance_days(&self, days: i64) {
        let current = self.now();
        self.set(current.plus_days(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.now.load(std::sync::atomic::Ordering::SeqCst))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_clock_shares_state() {
        let clock = std::sync::Arc::new(FixedClock::at(Timestamp::from_millis(5)));
        let handle = std::sync::Arc::clone(&clock);
        clock.advance_days(1);
        assert_eq!(handle.now(), Timestamp::from_millis(5).plus_days(1));
    }

    #[test]
    fn fixed_clock_is_settable() {
        let clock = FixedClock::at(Timestamp::from_millis(1000));
        assert_eq!(clock.now().millis(), 1000);

        clock.advance_days(2);
        assert_eq!(clock.now(), Timestamp::from_millis(1000).plus_days(2));
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now().millis() > 0);
    }
}
