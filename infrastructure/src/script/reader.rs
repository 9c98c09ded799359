//! Replay script reader
//!
//! Scripts are JSONL: one [`ScriptStep`] per line. Blank lines and lines
//! starting with `#` are skipped.

use super::step::ScriptStep;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Could not read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A parsed step and the 1-based line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: ScriptStep,
}

pub struct ScriptReader;

impl ScriptReader {
    /// Read and parse a script file
    pub fn read(path: impl AsRef<Path>) -> Result<Vec<ScriptLine>, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse script text, stopping at the first malformed line
    pub fn parse(content: &str) -> Result<Vec<ScriptLine>, ScriptError> {
        content
            .lines()
            .enumerate()
            .map(|(i, raw)| (i + 1, raw.trim()))
            .filter(|(_, raw)| !raw.is_empty() && !raw.starts_with('#'))
            .map(|(line, raw)| {
                serde_json::from_str(raw)
                    .map(|step| ScriptLine { line, step })
                    .map_err(|source| ScriptError::Parse { line, source })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let script = r#"
# Charter vote
{"step": "propose", "author": "1", "text": "Adopt the charter"}

{"step": "vote", "author": "2", "state": "yes"}
   # indented comment
{"step": "advance", "minutes": 30}
"#;
        let lines = ScriptReader::parse(script).unwrap();
        let numbers: Vec<_> = lines.iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![3, 5, 7]);
        assert_eq!(lines[2].step, ScriptStep::Advance { minutes: 30.0 });
    }

    #[test]
    fn test_parse_reports_line_of_bad_step() {
        let script = "{\"step\": \"sweep\"}\n\n{\"step\": \"explode\"}\n";
        let err = ScriptReader::parse(script).unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 3, .. }));
        assert!(err.to_string().starts_with("Line 3:"));
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.jsonl");
        std::fs::write(&path, "{\"step\": \"kill\", \"motion\": 1}\n").unwrap();

        let lines = ScriptReader::read(&path).unwrap();
        assert_eq!(
            lines[0].step,
            ScriptStep::Kill {
                council: None,
                motion: Some(1)
            }
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = ScriptReader::read("/nonexistent/replay.jsonl").unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
    }
}
