//! Councils: configuration, motion history and resolution effects.

pub mod config;
pub mod entity;
pub mod finish;
pub mod report;
pub mod stats;
pub mod validation;

pub use config::{CouncilConfig, MAX_MOTION_LENGTH, MAX_REASON_LENGTH};
pub use entity::{Ballot, Council, CouncilId, VoteReceipt, VoteSource};
pub use finish::{FinishAction, FinishActionKind, FinishActions};
pub use report::{ResolutionEffect, ResolutionReport};
pub use stats::{CouncilStats, MemberActivity};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
