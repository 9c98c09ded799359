//! Weighted vote tally
//!
//! # Example
//!
//! ```
//! use votum_domain::motion::{Majority, required_to_pass};
//!
//! // A simple majority is never satisfied by an exact tie
//! assert_eq!(required_to_pass(10.0, Majority::SIMPLE), 6.0);
//! assert_eq!(required_to_pass(11.0, Majority::SIMPLE), 6.0);
//! assert_eq!(required_to_pass(7.0, Majority::UNANIMOUS), 7.0);
//! ```

use super::majority::Majority;
use super::vote::{Vote, VoteState};
use crate::membership::{MemberId, WeightTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Weighted sums of the votes on a motion
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: f64,
    pub no: f64,
    pub abs: f64,
    /// Weight one side needs to decide the motion
    pub to_pass: f64,
    /// A dictator cast a non-abstaining vote
    pub dictator_voted: bool,
}

impl Tally {
    /// Weight that has not voted against or abstained
    pub fn open_weight(&self, total_weight: f64) -> f64 {
        total_weight - self.no - self.abs
    }

    pub fn is_tied(&self) -> bool {
        self.yes == self.no
    }

    /// One side reached `to_pass`
    pub fn majority_reached(&self) -> bool {
        self.yes >= self.to_pass || self.no >= self.to_pass
    }
}

/// Minimum weight one side needs for a decisive majority
///
/// Unanimity needs the whole weight. Any other majority needs the smallest
/// whole weight strictly above the fractional threshold, never more than
/// the total.
pub fn required_to_pass(total_weight: f64, required_majority: Majority) -> f64 {
    if total_weight <= 0.0 {
        return 0.0;
    }
    if required_majority.is_unanimous() {
        return total_weight;
    }

    ((total_weight * required_majority.value()).floor() + 1.0).min(total_weight)
}

/// Tally `votes` against an electorate of `total_weight`
///
/// Each author counts once, with their weight from `weights`.
pub fn tally(
    votes: &[Vote],
    required_majority: Majority,
    total_weight: f64,
    weights: &WeightTable,
) -> Tally {
    let mut result = Tally {
        to_pass: required_to_pass(total_weight, required_majority),
        ..Tally::default()
    };
    let mut seen: HashSet<&MemberId> = HashSet::new();

    for vote in votes {
        if !seen.insert(&vote.author_id) {
            continue;
        }

        let weight = weights.weight_of(&vote.author_id);
        match vote.state {
            VoteState::For => result.yes += weight,
            VoteState::Against => result.no += weight,
            VoteState::Abstain => result.abs += weight,
        }

        if vote.is_override() {
            result.dictator_voted = true;
        }
    }

    result
}
