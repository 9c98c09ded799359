//! Presentation layer for votum
//!
//! This crate contains CLI definitions, output formatters
//! and the console event notifier.

pub mod cli;
pub mod notify;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use notify::reporter::ConsoleNotifier;
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, OutputFormatter, formatter_for};
