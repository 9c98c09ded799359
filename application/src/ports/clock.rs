//! Clock port
//!
//! Expiration and cooldowns are computed from timestamps the caller passes
//! in. The use cases read them from a [`Clock`] so replays and tests can
//! control time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use votum_domain::Timestamp;

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now(&self) -> Timestamp;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp_millis().max(0) as Timestamp
    }
}

/// Time that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) -> Timestamp {
        let by = by.as_millis() as u64;
        self.now.fetch_add(by, Ordering::SeqCst) + by
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now(), 1_000);
        assert_eq!(clock.advance(Duration::from_secs(60)), 61_000);
        assert_eq!(clock.now(), 61_000);
        clock.set(5);
        assert_eq!(clock.now(), 5);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800_000);
    }
}
