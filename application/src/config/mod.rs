//! Application-level configuration.
//!
//! - [`ElectionDefaults`]: phase durations for elections opened without explicit ones

pub mod election_defaults;

pub use election_defaults::ElectionDefaults;
