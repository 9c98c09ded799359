//! Motions: proposals, votes, tallies and resolution.

pub mod entity;
pub mod majority;
pub mod options;
pub mod tally;
pub mod vote;

pub use entity::{
    CastOutcome, Motion, MotionResolution, MotionResolved, VotingContext, VotingRules,
};
pub use majority::Majority;
pub use options::{MotionOptions, parse_motion_input};
pub use tally::{Tally, required_to_pass, tally};
pub use vote::{CastVoteStatus, Vote, VoteState};
