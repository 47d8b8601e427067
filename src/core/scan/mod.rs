//! Batch scanning
//!
//! [`ScanOrchestrator`] runs document batches (extract, then scan text) and
//! table batches (sample, then scan cells). Each item yields exactly one
//! report entry in submission order; per-item failures never abort a batch.
//!
//! # Example
//!
//! ```rust,no_run
//! use sift::core::scan::{DocumentItem, ScanOrchestrator};
//! use sift::detection::{PatternRegistry, RuleSelection};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(PatternRegistry::default_patterns()?);
//! let orchestrator = ScanOrchestrator::new(registry);
//!
//! let items = vec![DocumentItem::new("notes.txt", "Contact: jane@example.com")];
//! let report = orchestrator
//!     .scan_documents(items, &RuleSelection::parse_list("email,phone"))
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&report.results)?);
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod orchestrator;
pub mod report;
pub mod summary;

pub use audit::{fingerprint, ScanAuditLogger};
pub use orchestrator::{DocumentItem, ScanOptions, ScanOrchestrator, TableTarget};
pub use report::{
    BatchReport, DetailedDocumentResult, DetailedScanReport, DocumentOutcome, DocumentResult,
    ScanReport, TableOutcome, TableScanReport,
};
pub use summary::{
    classify_column_name, summarize_tables, CategoryCounts, ColumnClassification, ColumnSummary,
    DatabaseSummary, TableClassification, TableSummary,
};
