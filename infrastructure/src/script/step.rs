//! Steps of a replay script
//!
//! One JSON object per line, discriminated by `step`:
//!
//! ```text
//! {"step": "propose", "author": "1", "text": "-m 2/3 Adopt the charter"}
//! {"step": "vote", "author": "2", "state": "yes"}
//! {"step": "advance", "minutes": 90}
//! {"step": "open_election", "reason": "New chair", "channel": "elections"}
//! ```
//!
//! Steps that address a council default to the primary council when
//! `council` is omitted, and motion steps default to the single active
//! motion when `motion` is omitted.

use serde::{Deserialize, Deserializer};
use std::time::Duration;
use votum_domain::VoteState;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Propose {
        #[serde(default)]
        council: Option<String>,
        author: String,
        /// Options followed by the motion text
        text: String,
    },
    Vote {
        #[serde(default)]
        council: Option<String>,
        #[serde(default)]
        motion: Option<u32>,
        author: String,
        /// "yes", "no", "abstain" and their aliases
        #[serde(deserialize_with = "vote_state")]
        state: VoteState,
        #[serde(default)]
        reason: Option<String>,
        /// Cast through a command instead of a reaction
        #[serde(default)]
        command: bool,
    },
    Retract {
        #[serde(default)]
        council: Option<String>,
        #[serde(default)]
        motion: Option<u32>,
        author: String,
    },
    Kill {
        #[serde(default)]
        council: Option<String>,
        #[serde(default)]
        motion: Option<u32>,
    },
    /// Move the replay clock forward
    Advance { minutes: f64 },
    /// Run the expiry check; every council when `council` is omitted
    Sweep {
        #[serde(default)]
        council: Option<String>,
    },
    SetWeight {
        #[serde(default)]
        council: Option<String>,
        /// Member or role id
        target: String,
        weight: f64,
    },
    OpenElection {
        reason: String,
        channel: String,
        #[serde(default)]
        candidacy_minutes: Option<f64>,
    },
    Candidate {
        #[serde(default)]
        election: Option<String>,
        #[serde(default)]
        channel: Option<String>,
        id: String,
        name: String,
        #[serde(default)]
        reason: String,
    },
    CloseCandidacy {
        #[serde(default)]
        election: Option<String>,
        #[serde(default)]
        channel: Option<String>,
        #[serde(default)]
        voting_minutes: Option<f64>,
    },
    Ballot {
        #[serde(default)]
        election: Option<String>,
        #[serde(default)]
        channel: Option<String>,
        author: String,
        /// 1-based candidate marker
        marker: usize,
    },
    Announce {
        #[serde(default)]
        election: Option<String>,
        #[serde(default)]
        channel: Option<String>,
    },
    CancelElection { election: String },
}

impl ScriptStep {
    /// Step name, as written in the `step` field
    pub fn name(&self) -> &'static str {
        match self {
            ScriptStep::Propose { .. } => "propose",
            ScriptStep::Vote { .. } => "vote",
            ScriptStep::Retract { .. } => "retract",
            ScriptStep::Kill { .. } => "kill",
            ScriptStep::Advance { .. } => "advance",
            ScriptStep::Sweep { .. } => "sweep",
            ScriptStep::SetWeight { .. } => "set_weight",
            ScriptStep::OpenElection { .. } => "open_election",
            ScriptStep::Candidate { .. } => "candidate",
            ScriptStep::CloseCandidacy { .. } => "close_candidacy",
            ScriptStep::Ballot { .. } => "ballot",
            ScriptStep::Announce { .. } => "announce",
            ScriptStep::CancelElection { .. } => "cancel_election",
        }
    }
}

/// Convert a script's minutes into a duration
///
/// `None` for negative, zero or non-finite values.
pub fn minutes(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value * 60.0)
        .ok()
        .filter(|d| !d.is_zero())
}

fn vote_state<'de, D>(deserializer: D) -> Result<VoteState, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Label(String),
        Value(i8),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Label(label) => label.parse().map_err(serde::de::Error::custom),
        Raw::Value(value) => VoteState::try_from(value).map_err(serde::de::Error::custom),
    }
}
