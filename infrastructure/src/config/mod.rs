//! Configuration file loading for votum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `VOTUM_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./votum.toml` or `./.votum.toml`
//! 4. Global: `$XDG_CONFIG_HOME/votum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileCouncilConfig, FileElectionConfig, FileLogConfig};
pub use loader::ConfigLoader;
