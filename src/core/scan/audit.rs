//! Scan audit trail
//!
//! Appends one JSON object per line describing each batch and each item.
//! Matched values are recorded only as SHA-256 fingerprints; plaintext PII
//! never reaches the audit file. Write failures are logged and never fail
//! a scan.

use crate::config::AuditConfig;
use crate::domain::{Result, SiftError};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// SHA-256 of a matched value, hex encoded
pub fn fingerprint(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Default, Serialize)]
struct AuditMatches {
    count: usize,
    value_hashes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum AuditEvent<'a> {
    BatchStarted {
        timestamp: String,
        batch_id: Uuid,
        kind: &'a str,
        items: usize,
    },
    ItemScanned {
        timestamp: String,
        batch_id: Uuid,
        item: &'a str,
        matches: BTreeMap<&'a str, AuditMatches>,
    },
    ItemFailed {
        timestamp: String,
        batch_id: Uuid,
        item: &'a str,
        error: &'a str,
    },
    BatchCompleted {
        timestamp: String,
        batch_id: Uuid,
        total: usize,
        failed: usize,
        duration_ms: u64,
    },
}

/// JSONL audit logger for scan batches
#[derive(Debug)]
pub struct ScanAuditLogger {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl ScanAuditLogger {
    /// Create a logger writing to `log_path`, creating its directory
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Io`] if the directory cannot be created.
    pub fn new(log_path: impl Into<PathBuf>) -> Result<Self> {
        let log_path = log_path.into();
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SiftError::Io(format!(
                        "Failed to create audit log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Logger for the `[audit]` section, or `None` when auditing is disabled
    pub fn from_config(config: &AuditConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(config.log_path.clone()).map(Some)
    }

    /// Path of the audit file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn batch_started(&self, batch_id: Uuid, kind: &str, items: usize) {
        self.record(&AuditEvent::BatchStarted {
            timestamp: Utc::now().to_rfc3339(),
            batch_id,
            kind,
            items,
        });
    }

    /// Record a scanned item from `(pii_type, value)` pairs
    pub fn item_scanned<'a, I>(&self, batch_id: Uuid, item: &'a str, matches: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut grouped: BTreeMap<&'a str, AuditMatches> = BTreeMap::new();
        for (pii_type, value) in matches {
            let entry = grouped.entry(pii_type).or_default();
            entry.count += 1;
            entry.value_hashes.push(fingerprint(value));
        }

        self.record(&AuditEvent::ItemScanned {
            timestamp: Utc::now().to_rfc3339(),
            batch_id,
            item,
            matches: grouped,
        });
    }

    pub fn item_failed(&self, batch_id: Uuid, item: &str, error: &str) {
        self.record(&AuditEvent::ItemFailed {
            timestamp: Utc::now().to_rfc3339(),
            batch_id,
            item,
            error,
        });
    }

    pub fn batch_completed(&self, batch_id: Uuid, total: usize, failed: usize, duration_ms: u64) {
        self.record(&AuditEvent::BatchCompleted {
            timestamp: Utc::now().to_rfc3339(),
            batch_id,
            total,
            failed,
            duration_ms,
        });
    }

    fn record(&self, event: &AuditEvent<'_>) {
        if let Err(e) = self.write_event(event) {
            tracing::warn!(
                path = %self.log_path.display(),
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    fn write_event(&self, event: &AuditEvent<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SiftError::Io("Audit log lock poisoned".to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_fingerprint_is_stable_sha256() {
        assert_eq!(fingerprint("a@example.com"), fingerprint("a@example.com"));
        assert_ne!(fingerprint("a@example.com"), fingerprint("b@example.com"));
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_disabled_config_creates_no_logger() {
        let config = AuditConfig::default();
        assert!(ScanAuditLogger::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_events_are_appended_without_plaintext() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");
        let logger = ScanAuditLogger::new(&path).unwrap();
        let batch_id = Uuid::new_v4();

        logger.batch_started(batch_id, "documents", 2);
        logger.item_scanned(
            batch_id,
            "contacts.txt",
            [("email", "jane@example.com"), ("email", "joe@example.com")],
        );
        logger.item_failed(batch_id, "broken.docx", "Invalid docx package");
        logger.batch_completed(batch_id, 2, 1, 15);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("jane@example.com"));

        let events = read_lines(&path);
        assert_eq!(events.len(), 4);
        assert_eq!(events[0]["event"], "batch_started");
        assert_eq!(events[1]["event"], "item_scanned");
        assert_eq!(events[1]["matches"]["email"]["count"], 2);
        assert_eq!(
            events[1]["matches"]["email"]["value_hashes"][0],
            fingerprint("jane@example.com").as_str()
        );
        assert_eq!(events[2]["error"], "Invalid docx package");
        assert_eq!(events[3]["failed"], 1);
        assert_eq!(events[3]["batch_id"], batch_id.to_string().as_str());
    }
}
