//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod election;
pub mod forward;
pub mod motion;
