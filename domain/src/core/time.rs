//! Millisecond timestamps.
//!
//! The engine never reads the wall clock itself; callers pass `now` in.

use std::time::Duration;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Time elapsed between `start` and `now`, zero if `now` is earlier.
pub fn elapsed(start: Timestamp, now: Timestamp) -> Duration {
    Duration::from_millis(now.saturating_sub(start))
}

/// The timestamp `duration` after `start`.
pub fn after(start: Timestamp, duration: Duration) -> Timestamp {
    start.saturating_add(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
