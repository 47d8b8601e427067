//! Scan reports
//!
//! Every submitted item produces exactly one entry, in submission order.
//! Entries are untagged so they serialize as either the success shape or
//! the `{ name, error }` failure shape.

use crate::detection::TextFindings;
use crate::domain::TableMatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Common behavior of per-document entries
pub trait DocumentOutcome: Sized {
    /// Entry for a successfully scanned document
    fn scanned(file_name: String, findings: TextFindings) -> Self;

    /// Entry for a document that could not be scanned
    fn failed(file_name: String, error: String) -> Self;

    /// Name of the submitted item
    fn file_name(&self) -> &str;

    /// Failure message, if the item failed
    fn error(&self) -> Option<&str>;
}

/// Summary entry: per-type match counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentResult {
    Scanned {
        file_name: String,
        pii_found: bool,
        classifications: BTreeMap<String, usize>,
    },
    Failed {
        file_name: String,
        error: String,
    },
}

impl DocumentOutcome for DocumentResult {
    fn scanned(file_name: String, findings: TextFindings) -> Self {
        Self::Scanned {
            file_name,
            pii_found: findings.has_pii(),
            classifications: findings.counts(),
        }
    }

    fn failed(file_name: String, error: String) -> Self {
        Self::Failed { file_name, error }
    }

    fn file_name(&self) -> &str {
        match self {
            Self::Scanned { file_name, .. } | Self::Failed { file_name, .. } => file_name,
        }
    }

    fn error(&self) -> Option<&str> {
        match self {
            Self::Scanned { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Detailed entry: matched values and line locations per type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailedDocumentResult {
    Scanned {
        file_name: String,
        pii_found: bool,
        matches: BTreeMap<String, Vec<String>>,
        locations: BTreeMap<String, Vec<String>>,
    },
    Failed {
        file_name: String,
        error: String,
    },
}

impl DocumentOutcome for DetailedDocumentResult {
    fn scanned(file_name: String, findings: TextFindings) -> Self {
        Self::Scanned {
            file_name,
            pii_found: findings.has_pii(),
            matches: findings.matches,
            locations: findings.locations,
        }
    }

    fn failed(file_name: String, error: String) -> Self {
        Self::Failed { file_name, error }
    }

    fn file_name(&self) -> &str {
        match self {
            Self::Scanned { file_name, .. } | Self::Failed { file_name, .. } => file_name,
        }
    }

    fn error(&self) -> Option<&str> {
        match self {
            Self::Scanned { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Result of one document batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport<R> {
    /// Unique batch identifier, also used in logs and the audit trail
    pub batch_id: Uuid,

    /// When the batch started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the batch
    pub duration_ms: u64,

    /// One entry per submitted item, in submission order
    pub results: Vec<R>,
}

impl<R: DocumentOutcome> BatchReport<R> {
    /// Number of items that failed
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.error().is_some()).count()
    }

    /// Whether any item failed
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

/// Summary-shape document report
pub type ScanReport = BatchReport<DocumentResult>;

/// Detailed-shape document report
pub type DetailedScanReport = BatchReport<DetailedDocumentResult>;

/// Outcome for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableOutcome {
    Scanned {
        table: String,
        row_count: usize,
        columns: Vec<String>,
        records: Vec<TableMatch>,
    },
    Failed {
        table: String,
        error: String,
    },
}

impl TableOutcome {
    /// Table name
    pub fn table(&self) -> &str {
        match self {
            Self::Scanned { table, .. } | Self::Failed { table, .. } => table,
        }
    }

    /// Failure message, if sampling or scanning failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Scanned { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Result of one table batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableScanReport {
    pub batch_id: Uuid,
    pub database: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,

    /// One outcome per table, in request order
    pub tables: Vec<TableOutcome>,
}

impl TableScanReport {
    /// All match records, table by table
    pub fn records(&self) -> impl Iterator<Item = &TableMatch> {
        self.tables.iter().flat_map(|outcome| match outcome {
            TableOutcome::Scanned { records, .. } => records.as_slice(),
            TableOutcome::Failed { .. } => &[],
        })
    }

    /// Flatten into the plain record list
    pub fn into_records(self) -> Vec<TableMatch> {
        self.tables
            .into_iter()
            .flat_map(|outcome| match outcome {
                TableOutcome::Scanned { records, .. } => records,
                TableOutcome::Failed { .. } => Vec::new(),
            })
            .collect()
    }

    /// `(table, error)` for every failed table
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.tables
            .iter()
            .filter_map(|outcome| outcome.error().map(|error| (outcome.table(), error)))
            .collect()
    }

    /// Whether any table failed
    pub fn has_failures(&self) -> bool {
        self.tables.iter().any(|outcome| outcome.error().is_some())
    }
}
