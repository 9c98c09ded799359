//! Vote types for motions

use crate::membership::MemberId;
use serde::{Deserialize, Serialize};

/// Position taken by a vote
///
/// Serialized as `-1`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum VoteState {
    Against,
    Abstain,
    For,
}

impl VoteState {
    pub fn value(self) -> i8 {
        match self {
            VoteState::Against => -1,
            VoteState::Abstain => 0,
            VoteState::For => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VoteState::Against => "Against",
            VoteState::Abstain => "Abstain",
            VoteState::For => "For",
        }
    }
}

impl From<VoteState> for i8 {
    fn from(state: VoteState) -> Self {
        state.value()
    }
}

impl TryFrom<i8> for VoteState {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(VoteState::Against),
            0 => Ok(VoteState::Abstain),
            1 => Ok(VoteState::For),
            other => Err(format!("Invalid vote state: {}", other)),
        }
    }
}

impl std::fmt::Display for VoteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for VoteState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "for" | "aye" | "+1" | "1" => Ok(VoteState::For),
            "no" | "against" | "nay" | "-1" => Ok(VoteState::Against),
            "abstain" | "blank" | "0" => Ok(VoteState::Abstain),
            _ => Err(format!(
                "Unknown vote state: {}. Valid: yes, no, abstain",
                s
            )),
        }
    }
}

/// A single vote on a motion
///
/// At most one vote per `author_id` exists on a motion at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub author_id: MemberId,
    pub author_name: String,
    /// Short label shown next to the vote (e.g. "For (reaction)")
    pub name: String,
    pub state: VoteState,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub is_dictator: bool,
}

impl Vote {
    pub fn new(
        author_id: impl Into<MemberId>,
        author_name: impl Into<String>,
        state: VoteState,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            author_name: author_name.into(),
            name: state.label().to_string(),
            state,
            reason: String::new(),
            is_dictator: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn as_dictator(mut self) -> Self {
        self.is_dictator = true;
        self
    }

    /// A privileged vote that ends the motion on the spot
    pub fn is_override(&self) -> bool {
        self.is_dictator && self.state != VoteState::Abstain
    }
}

/// What happened to the caller's own vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastVoteStatus {
    /// First vote by this author
    New,
    /// Replaced an earlier vote by this author
    Changed,
    /// The vote was not recorded
    Failed,
}

impl std::fmt::Display for CastVoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastVoteStatus::New => write!(f, "New"),
            CastVoteStatus::Changed => write!(f, "Changed"),
            CastVoteStatus::Failed => write!(f, "Failed"),
        }
    }
}
