//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod clock;
pub mod finish_action;
pub mod notification;
