//! Event log settings from TOML (`[log]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// JSONL file receiving every governance event
    pub event_log: Option<PathBuf>,
}
