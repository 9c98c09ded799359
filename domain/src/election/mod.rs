//! Elections: candidacy, single-choice ballots and ranked results.

pub mod entity;
pub mod results;

pub use entity::{Candidate, Election, ElectionId, ElectionPhase, ElectionVote, PhaseTransition};
pub use results::{ElectionResults, Standing};
