//! In-memory repositories for councils and elections.

pub mod council;
pub mod election;

pub use council::{CouncilRegistry, SharedCouncil};
pub use election::{ElectionRegistry, SharedElection};
