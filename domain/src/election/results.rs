//! Election results

use super::entity::{Candidate, ElectionId};
use serde::{Deserialize, Serialize};

/// Vote count of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub candidate: Candidate,
    pub votes: usize,
}

/// Ranked outcome of a finished election
///
/// Standings are sorted by descending vote count. Candidates with the same
/// count keep their registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionResults {
    pub election: ElectionId,
    pub reason: String,
    pub standings: Vec<Standing>,
    /// Number of effective ballots
    pub ballots: usize,
}

impl ElectionResults {
    pub(crate) fn rank(
        election: ElectionId,
        reason: String,
        mut standings: Vec<Standing>,
        ballots: usize,
    ) -> Self {
        // `sort_by` is stable, registration order breaks ties
        standings.sort_by(|a, b| b.votes.cmp(&a.votes));
        Self {
            election,
            reason,
            standings,
            ballots,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    /// Candidates sharing the highest count; empty when nobody got a vote
    pub fn winners(&self) -> Vec<&Candidate> {
        let Some(top) = self.standings.first().map(|s| s.votes) else {
            return Vec::new();
        };
        if top == 0 {
            return Vec::new();
        }
        self.standings
            .iter()
            .take_while(|s| s.votes == top)
            .map(|s| &s.candidate)
            .collect()
    }
}
