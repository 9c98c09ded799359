//! JSONL file writer for governance events.
//!
//! Each [`GovernanceEvent`] is serialized as a single JSON line carrying its
//! `type` tag plus a wall-clock `timestamp`, appended via a buffered writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use votum_application::ports::notification::{GovernanceEvent, GovernanceNotifier};

/// Event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Create a new event log writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GovernanceNotifier for JsonlEventLog {
    fn notify(&self, event: &GovernanceEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not serialize {} event: {}", event.event_type(), e);
                return;
            }
        };
        if let serde_json::Value::Object(map) = &mut record {
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
        }

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Append-only; flush each line so a crash loses nothing
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
