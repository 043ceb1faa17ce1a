//! # hearth-history
//!
//! Append-only command history, capped to the most recent entries.
//!
//! History is observability, not functionality: every write is fail-silent
//! (logged, never propagated), so a full disk or corrupt file can never
//! break a user request. Command parameters are not recorded — entries
//! keep only `service` + target entity per command.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hearth_core::Command;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

/// A simplified command record: service and target only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Service identifier, e.g. `light.turn_on`.
    pub service: String,
    /// Primary target entity.
    pub entity_id: String,
}

/// One history entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Entry id (UUID v7, time-ordered).
    pub id: String,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// The user's original text.
    pub user_text: String,
    /// Device that initiated the request.
    pub device_id: String,
    /// Conversation/session key.
    pub session_id: String,
    /// Text returned to the user.
    pub response: String,
    /// Outcome: `None` while pending, otherwise the aggregate result.
    pub success: Option<bool>,
    /// Simplified commands involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<CommandRecord>>,
    /// Free-form metadata (e.g. the session status at record time).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl HistoryEntry {
    /// Create an entry stamped now.
    pub fn new(
        user_text: impl Into<String>,
        device_id: impl Into<String>,
        response: impl Into<String>,
        success: Option<bool>,
    ) -> Self {
        let device_id = device_id.into();
        Self {
            id: Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            user_text: user_text.into(),
            session_id: device_id.clone(),
            device_id,
            response: response.into(),
            success,
            commands: None,
            metadata: None,
        }
    }

    /// Attach simplified command records.
    #[must_use]
    pub fn with_commands(mut self, commands: &[Command]) -> Self {
        self.commands = Some(simplify_commands(commands));
        self
    }

    /// Attach a single metadata key.
    #[must_use]
    pub fn with_status(mut self, status: &str) -> Self {
        let mut metadata = self.metadata.unwrap_or_default();
        let _ = metadata.insert(
            "status".to_string(),
            Value::String(status.to_string()),
        );
        self.metadata = Some(metadata);
        self
    }
}

/// Strip commands down to service + target.
pub fn simplify_commands(commands: &[Command]) -> Vec<CommandRecord> {
    commands
        .iter()
        .map(|c| CommandRecord {
            service: c.service.clone(),
            entity_id: c.target_label(),
        })
        .collect()
}

/// The capped JSON-array history file.
pub struct HistoryLog {
    path: PathBuf,
    max_entries: usize,
    // Serializes read-modify-write cycles across concurrent conversations.
    write_lock: Mutex<()>,
}

impl HistoryLog {
    /// Create a log writing to `path`, keeping `max_entries` entries.
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries: max_entries.max(1),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry, evicting the oldest beyond the cap.
    ///
    /// Fail-silent: any I/O or serialization problem is logged and
    /// swallowed. A corrupt existing file is replaced rather than
    /// propagated.
    pub fn append(&self, entry: HistoryEntry) {
        let _guard = self.write_lock.lock();

        let mut entries = self.read_entries();
        entries.push(entry);
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            let _ = entries.drain(..excess);
        }

        if let Err(error) = self.write_entries(&entries) {
            warn!(%error, path = %self.path.display(), "failed to write command history");
        } else {
            debug!(count = entries.len(), "recorded history entry");
        }
    }

    /// All recorded entries, oldest first. Empty on any read problem.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let _guard = self.write_lock.lock();
        self.read_entries()
    }

    fn read_entries(&self) -> Vec<HistoryEntry> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                warn!(%error, path = %self.path.display(), "history file corrupt, starting fresh");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    fn write_entries(&self, entries: &[HistoryEntry]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(entries)?;
        std::fs::write(&self.path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(service: &str, entity_id: &str) -> Command {
        let mut data = Map::new();
        let _ = data.insert("entity_id".to_string(), json!(entity_id));
        let _ = data.insert("brightness".to_string(), json!(255));
        Command {
            service: service.to_string(),
            data,
        }
    }

    fn log_in(dir: &tempfile::TempDir, max: usize) -> HistoryLog {
        HistoryLog::new(dir.path().join("command_history.json"), max)
    }

    #[test]
    fn append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir, 100);

        log.append(
            HistoryEntry::new("lights on", "cli", "Done.", Some(true))
                .with_commands(&[command("light.turn_on", "light.office")]),
        );

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_text, "lights on");
        assert_eq!(entries[0].success, Some(true));
        let commands = entries[0].commands.as_ref().unwrap();
        assert_eq!(commands[0].service, "light.turn_on");
        assert_eq!(commands[0].entity_id, "light.office");
    }

    #[test]
    fn commands_are_simplified() {
        let records = simplify_commands(&[command("light.turn_on", "light.office")]);
        assert_eq!(
            records,
            vec![CommandRecord {
                service: "light.turn_on".to_string(),
                entity_id: "light.office".to_string()
            }]
        );
        // Parameters like brightness never reach the record.
        let json = serde_json::to_value(&records).unwrap();
        assert!(json[0].get("brightness").is_none());
    }

    #[test]
    fn cap_evicts_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir, 3);

        for i in 0..5 {
            log.append(HistoryEntry::new(format!("req {i}"), "cli", "ok", Some(true)));
        }

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].user_text, "req 2");
        assert_eq!(entries[2].user_text, "req 4");
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir, 10);
        std::fs::write(log.path(), "{{{{ not json").unwrap();

        log.append(HistoryEntry::new("hello", "cli", "ok", None));
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir, 10);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn append_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("nested/deep/history.json"), 10);
        log.append(HistoryEntry::new("hello", "cli", "ok", None));
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn status_metadata_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(&dir, 10);
        log.append(
            HistoryEntry::new("lights on", "cli", "Shall I?", None)
                .with_status("awaiting_confirmation"),
        );

        let entries = log.entries();
        let metadata = entries[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["status"], json!("awaiting_confirmation"));
    }
}
