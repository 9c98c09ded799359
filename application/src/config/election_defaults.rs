//! Election timing defaults.
//!
//! [`ElectionDefaults`] holds the phase durations used when an election is
//! opened or advanced without explicit ones. Phase timers belong to the
//! caller; these values only feed the `ends_*_at` timestamps.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDefaults {
    /// Length of the candidacy phase.
    pub candidacy: Duration,
    /// Length of the voting phase.
    pub voting: Duration,
}

impl Default for ElectionDefaults {
    fn default() -> Self {
        Self {
            candidacy: Duration::from_secs(60 * 60),
            voting: Duration::from_secs(60 * 60),
        }
    }
}

impl ElectionDefaults {
    pub fn with_candidacy(mut self, duration: Duration) -> Self {
        self.candidacy = duration;
        self
    }

    pub fn with_voting(mut self, duration: Duration) -> Self {
        self.voting = duration;
        self
    }
}
