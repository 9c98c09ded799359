//! Replay scripts: recorded council and election events, one per line

mod reader;
mod step;

pub use reader::{ScriptError, ScriptLine, ScriptReader};
pub use step::{ScriptStep, minutes};
