//! Election entity and its phase machine
//!
//! ```text
//!   Candidacy ──start_voting──▶ Voting ──announce_results──▶ Finished
//!       │                                                       ▲
//!       └──────── close_candidacy (no candidates) / cancel ─────┘
//! ```
//!
//! Transitions called from the wrong phase are silent no-ops so callers may
//! invoke them twice. Only [`Election::add_candidate`] rejects out-of-phase
//! calls, since a late registration must be reported to the member.

use super::results::{ElectionResults, Standing};
use crate::core::error::DomainError;
use crate::core::time::{Timestamp, after};
use crate::membership::MemberId;
use crate::motion::CastVoteStatus;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of an election ("election-1", "election-2", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionId(String);

impl ElectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_sequence(n: u32) -> Self {
        Self(format!("election-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElectionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ElectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phase of an election
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionPhase {
    Candidacy,
    Voting,
    Finished,
}

impl ElectionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionPhase::Candidacy => "candidacy",
            ElectionPhase::Voting => "voting",
            ElectionPhase::Finished => "finished",
        }
    }
}

impl std::fmt::Display for ElectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectionPhase::Candidacy => write!(f, "Candidacy"),
            ElectionPhase::Voting => write!(f, "Voting"),
            ElectionPhase::Finished => write!(f, "Finished"),
        }
    }
}

impl std::str::FromStr for ElectionPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "candidacy" => Ok(ElectionPhase::Candidacy),
            "voting" => Ok(ElectionPhase::Voting),
            "finished" => Ok(ElectionPhase::Finished),
            _ => Err(format!("Unknown election phase: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: MemberId,
    pub name: String,
    pub reason: String,
}

impl Candidate {
    pub fn new(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// One member's current choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionVote {
    pub author_id: MemberId,
    pub candidate_id: MemberId,
}

/// What closing the candidacy phase led to
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseTransition {
    VotingOpened { ends_at: Timestamp },
    /// Nobody ran; the election ended with empty results
    Finished(ElectionResults),
}

/// A multi-candidate, one-member-one-vote election
///
/// The phase only moves forward and the candidate list is frozen once
/// voting opens, so all state changes go through the transition methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Election {
    id: ElectionId,
    reason: String,
    phase: ElectionPhase,
    ends_candidacy_at: Timestamp,
    ends_voting_at: Option<Timestamp>,
    /// Registration order; a candidate's ballot marker is its position + 1
    candidates: Vec<Candidate>,
    votes: Vec<ElectionVote>,
    message_id: Option<String>,
    channel_id: String,
}

impl Election {
    pub fn new(
        id: ElectionId,
        reason: impl Into<String>,
        channel_id: impl Into<String>,
        ends_candidacy_at: Timestamp,
    ) -> Self {
        Self {
            id,
            reason: reason.into(),
            phase: ElectionPhase::Candidacy,
            ends_candidacy_at,
            ends_voting_at: None,
            candidates: Vec::new(),
            votes: Vec::new(),
            message_id: None,
            channel_id: channel_id.into(),
        }
    }

    pub fn id(&self) -> &ElectionId {
        &self.id
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn phase(&self) -> ElectionPhase {
        self.phase
    }

    pub fn ends_candidacy_at(&self) -> Timestamp {
        self.ends_candidacy_at
    }

    pub fn ends_voting_at(&self) -> Option<Timestamp> {
        self.ends_voting_at
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn votes(&self) -> &[ElectionVote] {
        &self.votes
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ElectionPhase::Finished
    }

    pub fn set_message_id(&mut self, message_id: impl Into<String>) {
        self.message_id = Some(message_id.into());
    }

    /// Register a candidate
    ///
    /// Returns `Ok(false)` when the member is already registered; the first
    /// registration wins.
    pub fn add_candidate(&mut self, candidate: Candidate) -> Result<bool, DomainError> {
        if self.phase != ElectionPhase::Candidacy {
            return Err(DomainError::Phase {
                operation: "add_candidate",
                phase: self.phase,
            });
        }
        if self.candidates.iter().any(|c| c.id == candidate.id) {
            return Ok(false);
        }
        self.candidates.push(candidate);
        Ok(true)
    }

    /// Freeze the candidate list and open the ballot
    pub fn start_voting(&mut self, ends_at: Timestamp) -> bool {
        if self.phase != ElectionPhase::Candidacy {
            return false;
        }
        self.phase = ElectionPhase::Voting;
        self.ends_voting_at = Some(ends_at);
        true
    }

    /// End the candidacy phase
    ///
    /// Opens the ballot for `voting_duration`, or finishes right away when
    /// nobody ran. `None` outside the candidacy phase.
    pub fn close_candidacy(
        &mut self,
        now: Timestamp,
        voting_duration: Duration,
    ) -> Option<PhaseTransition> {
        if self.phase != ElectionPhase::Candidacy {
            return None;
        }

        if self.candidates.is_empty() {
            self.phase = ElectionPhase::Finished;
            return Some(PhaseTransition::Finished(self.results()));
        }

        let ends_at = after(now, voting_duration);
        self.start_voting(ends_at);
        Some(PhaseTransition::VotingOpened { ends_at })
    }

    /// Candidate behind a 1-based ballot marker
    pub fn candidate_for_marker(&self, marker: usize) -> Option<&Candidate> {
        marker.checked_sub(1).and_then(|i| self.candidates.get(i))
    }

    /// Record or replace a member's ballot
    ///
    /// `None` when the ballot is ignored: outside the voting phase or for a
    /// marker no candidate holds.
    pub fn cast_vote(&mut self, author: &MemberId, marker: usize) -> Option<CastVoteStatus> {
        if self.phase != ElectionPhase::Voting {
            return None;
        }
        let candidate_id = self.candidate_for_marker(marker)?.id.clone();

        match self.votes.iter_mut().find(|v| &v.author_id == author) {
            Some(existing) => {
                existing.candidate_id = candidate_id;
                Some(CastVoteStatus::Changed)
            }
            None => {
                self.votes.push(ElectionVote {
                    author_id: author.clone(),
                    candidate_id,
                });
                Some(CastVoteStatus::New)
            }
        }
    }

    /// Current count per candidate in registration order
    pub fn standings(&self) -> Vec<Standing> {
        self.candidates
            .iter()
            .map(|candidate| Standing {
                candidate: candidate.clone(),
                votes: self
                    .votes
                    .iter()
                    .filter(|v| v.candidate_id == candidate.id)
                    .count(),
            })
            .collect()
    }

    /// Close the ballot and rank the candidates
    pub fn announce_results(&mut self) -> Option<ElectionResults> {
        if self.phase != ElectionPhase::Voting {
            return None;
        }
        self.phase = ElectionPhase::Finished;
        Some(self.results())
    }

    /// Finish without results
    pub fn cancel(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.phase = ElectionPhase::Finished;
        true
    }

    fn results(&self) -> ElectionResults {
        ElectionResults::rank(
            self.id.clone(),
            self.reason.clone(),
            self.standings(),
            self.votes.len(),
        )
    }
}
