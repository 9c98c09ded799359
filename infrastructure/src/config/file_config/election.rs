//! Election timing from TOML (`[election]` section)
//!
//! ```toml
//! [election]
//! candidacy_minutes = 1440
//! voting_minutes = 720
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use votum_application::ElectionDefaults;
use votum_domain::{ConfigIssue, ConfigIssueCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileElectionConfig {
    pub candidacy_minutes: u64,
    pub voting_minutes: u64,
}

impl Default for FileElectionConfig {
    fn default() -> Self {
        Self {
            candidacy_minutes: 60,
            voting_minutes: 60,
        }
    }
}

impl FileElectionConfig {
    /// Zero durations fall back to the defaults and are reported
    pub fn to_defaults(&self) -> (ElectionDefaults, Vec<ConfigIssue>) {
        let fallback = ElectionDefaults::default();
        let mut issues = Vec::new();

        let defaults = ElectionDefaults {
            candidacy: minutes(self.candidacy_minutes, "candidacy_minutes", &mut issues)
                .unwrap_or(fallback.candidacy),
            voting: minutes(self.voting_minutes, "voting_minutes", &mut issues)
                .unwrap_or(fallback.voting),
        };

        (defaults, issues)
    }
}

fn minutes(value: u64, field: &str, issues: &mut Vec<ConfigIssue>) -> Option<Duration> {
    if value == 0 {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::InvalidDuration,
            format!("election.{}: must be at least 1, using the default", field),
        ));
        return None;
    }
    Some(Duration::from_secs(value * 60))
}
