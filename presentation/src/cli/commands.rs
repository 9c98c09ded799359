//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the final state
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable text
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for votum
#[derive(Parser, Debug)]
#[command(name = "votum")]
#[command(author, version, about = "Council votes and elections - replay recorded events against a council")]
#[command(long_about = r#"
Votum runs weighted council votes and multi-candidate elections.

A replay script lists recorded events, one JSON object per line:

  {"step": "propose", "author": "1", "text": "-m 2/3 Adopt the charter"}
  {"step": "vote", "author": "2", "state": "yes", "reason": "Long overdue"}
  {"step": "advance", "minutes": 90}
  {"step": "sweep"}

Each step is applied in order; events are printed as they happen and the
final state of every council is shown at the end.

Configuration files are loaded from (in priority order):
1. VOTUM_* environment variables
2. --config <path>     Explicit config file
3. ./votum.toml        Project-level config
4. ~/.config/votum/config.toml   Global config

Example:
  votum charter.jsonl
  votum --config senate.toml --output json session.jsonl
  votum --show-config
"#)]
pub struct Cli {
    /// Replay script to run (JSONL, one step per line)
    pub script: Option<PathBuf>,

    /// Output format for the final state
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Write every governance event to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not print events as they happen
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
