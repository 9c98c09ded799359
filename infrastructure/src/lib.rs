//! Infrastructure layer for votum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, configuration file loading and the
//! replay script reader.

pub mod config;
pub mod logging;
pub mod script;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileCouncilConfig, FileElectionConfig, FileLogConfig};
pub use logging::JsonlEventLog;
pub use script::{ScriptError, ScriptLine, ScriptReader, ScriptStep};
