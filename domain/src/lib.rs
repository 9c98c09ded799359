//! Domain layer for votum
//!
//! This crate contains the voting state machines and the value objects they
//! operate on. It performs no I/O and holds no locks: callers serialize
//! operations per council and per election and carry out the side effects
//! the state machines report.
//!
//! # Core Concepts
//!
//! ## Motions
//!
//! A motion is a proposal put to a council. Members vote for, against or
//! abstain; votes are weighted and a motion resolves exactly once:
//!
//! - **Passed** / **Failed**: a side reached the required majority, the other
//!   side can no longer reach it, or the motion expired with one side ahead
//! - **Killed**: withdrawn by the caller
//!
//! A dictator's non-abstaining vote resolves the motion on the spot.
//!
//! ## Elections
//!
//! Multi-candidate, one-member-one-vote elections move through
//! `Candidacy → Voting → Finished`, with ranked results.
//!
//! ## Weighted membership
//!
//! Every eligible (non-bot) member votes with weight 1 unless member or role
//! overrides apply. Overrides are cumulative.

pub mod core;
pub mod council;
pub mod election;
pub mod membership;
pub mod motion;

// Re-export commonly used types
pub use core::{
    error::{DomainError, ValidationError},
    time::Timestamp,
};
pub use council::{
    Ballot, ConfigIssue, ConfigIssueCode, Council, CouncilConfig, CouncilId, CouncilStats,
    FinishAction, FinishActionKind, FinishActions, MemberActivity, ResolutionEffect,
    ResolutionReport, Severity, VoteReceipt, VoteSource,
};
pub use election::{
    Candidate, Election, ElectionId, ElectionPhase, ElectionResults, ElectionVote,
    PhaseTransition, Standing,
};
pub use membership::{Member, MemberId, RoleId, WeightOverrides, WeightTable, compute_weights};
pub use motion::{
    CastOutcome, CastVoteStatus, Majority, Motion, MotionOptions, MotionResolution,
    MotionResolved, Tally, Vote, VoteState, VotingContext, VotingRules, parse_motion_input,
    required_to_pass, tally,
};
