//! Logging infrastructure: the structured governance event log.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer that implements
//! the [`GovernanceNotifier`](votum_application::GovernanceNotifier) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEventLog;
