use chrono::Local;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// The audit trail keeps at most this many entries; older ones are dropped.
const MAX_ENTRIES: usize = 1000;

/// One audit trail entry.
///
/// Simulated writes (there is no write-back path to the sheet) land here so
/// reviewers can see what a user attempted and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// RFC 3339 local timestamp.
    pub timestamp: String,
    /// Username or "anonimo".
    pub user: String,
    /// Short action tag, e.g. "status_change".
    pub action: String,
    /// Id of the affected record, when there is one.
    pub record_id: String,
    /// Free-text details.
    pub details: String,
}

/// Append-only audit log persisted as one JSON array on disk, capped at
/// [`MAX_ENTRIES`].
pub struct AuditLog {
    path: PathBuf,
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    /// Open (or start) the audit log at `path`.
    ///
    /// An unreadable or corrupt file starts the log empty with a warning
    /// rather than failing - losing audit history is preferable to refusing
    /// to boot.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Vec<AuditEntry>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("audit file {} unreadable ({}), starting empty", path.display(), e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        AuditLog {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Append an entry and persist the whole trail.
    ///
    /// # Arguments
    /// * `user` - Acting username
    /// * `action` - Short action tag
    /// * `record_id` - Affected record id, or empty
    /// * `details` - Free-text details
    pub fn record(
        &self,
        user: &str,
        action: &str,
        record_id: &str,
        details: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let entry = AuditEntry {
            timestamp: Local::now().to_rfc3339(),
            user: user.to_string(),
            action: action.to_string(),
            record_id: record_id.to_string(),
            details: details.to_string(),
        };
        let snapshot = {
            let mut entries = self.entries.write().unwrap();
            entries.push(entry);
            let len = entries.len();
            if len > MAX_ENTRIES {
                entries.drain(0..len - MAX_ENTRIES);
            }
            entries.clone()
        };
        self.persist(&snapshot)
    }

    fn persist(&self, entries: &[AuditEntry]) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// A copy of the current entries, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().unwrap().clone()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// True when the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
