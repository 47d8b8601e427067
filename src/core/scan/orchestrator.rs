//! Batch orchestration
//!
//! Items are scanned concurrently on the blocking pool, bounded by
//! `max_concurrency`, through an order-preserving buffered stream. A failing,
//! panicking or overlong item becomes that item's failure entry; the batch
//! itself fails only for an empty item list or an invalid rule selection.

use super::audit::ScanAuditLogger;
use super::report::{
    BatchReport, DetailedScanReport, DocumentOutcome, ScanReport, TableOutcome, TableScanReport,
};
use super::summary::{classify_column_name, ColumnClassification, TableClassification};
use crate::adapters::database::TableSource;
use crate::config::{ScanConfig, SiftConfig};
use crate::detection::{
    PatternRegistry, RuleSelection, RuleSet, TabularScanner, TextFindings, TextScanner,
};
use crate::domain::{Result, RowSample, SiftError, TableMatch};
use crate::extract::ExtractorRegistry;
use crate::{log_batch_complete, log_item_failed, log_scan_start};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

/// Execution limits for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Items processed concurrently
    pub max_concurrency: usize,

    /// Time budget per item
    pub item_timeout: Duration,

    /// Largest accepted document
    pub max_file_size_bytes: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
            item_timeout: Duration::from_secs(config.item_timeout_seconds),
            max_file_size_bytes: config.max_file_size_bytes(),
        }
    }
}

/// One document submitted for scanning
#[derive(Debug, Clone)]
pub struct DocumentItem {
    name: String,
    content: DocumentContent,
}

#[derive(Debug, Clone)]
enum DocumentContent {
    Bytes(Vec<u8>),
    File(PathBuf),
    Unreadable(String),
}

impl DocumentItem {
    /// Document with in-memory content; the name selects the extractor
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: DocumentContent::Bytes(bytes.into()),
        }
    }

    /// Placeholder for a document that could not be read; it is reported as
    /// a failed item
    pub fn unreadable(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: DocumentContent::Unreadable(error.into()),
        }
    }

    /// Document on disk, named after its file name
    ///
    /// The file is read only when its turn in the batch comes, after its size
    /// has been checked against the limit. Read errors become failed items.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            content: DocumentContent::File(path),
        }
    }

    /// Item name as reported
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Which tables a table scan covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableTarget {
    /// A single named table
    Table(String),

    /// Every table the source lists
    All,
}

/// Runs document and table batches against a shared pattern registry
#[derive(Debug, Clone)]
pub struct ScanOrchestrator {
    registry: Arc<PatternRegistry>,
    extractors: Arc<ExtractorRegistry>,
    options: ScanOptions,
    audit: Option<Arc<ScanAuditLogger>>,
}

impl ScanOrchestrator {
    /// Orchestrator with the default extractors and limits
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self {
            registry,
            extractors: Arc::new(ExtractorRegistry::with_defaults()),
            options: ScanOptions::default(),
            audit: None,
        }
    }

    /// Build from configuration: pattern library, limits and audit trail
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern library is invalid or the audit
    /// directory cannot be created.
    pub fn from_config(config: &SiftConfig) -> Result<Self> {
        let registry = match config.scan.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path)?,
            None => PatternRegistry::default_patterns()?,
        };

        let mut orchestrator =
            Self::new(Arc::new(registry)).with_options(ScanOptions::from(&config.scan));
        if let Some(audit) = ScanAuditLogger::from_config(&config.audit)? {
            orchestrator = orchestrator.with_audit(audit);
        }
        Ok(orchestrator)
    }

    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = Arc::new(extractors);
        self
    }

    /// Replace the execution limits; concurrency is at least one
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = ScanOptions {
            max_concurrency: options.max_concurrency.max(1),
            ..options
        };
        self
    }

    pub fn with_audit(mut self, audit: ScanAuditLogger) -> Self {
        self.audit = Some(Arc::new(audit));
        self
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan documents, reporting per-type match counts
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Validation`] for an empty item list and
    /// [`SiftError::Registry`] for unknown rule names. Item failures never
    /// fail the batch.
    pub async fn scan_documents(
        &self,
        items: Vec<DocumentItem>,
        selection: &RuleSelection,
    ) -> Result<ScanReport> {
        self.run_documents(items, selection).await
    }

    /// Scan documents, reporting matched values and line locations
    ///
    /// # Errors
    ///
    /// Same as [`scan_documents`](Self::scan_documents).
    pub async fn scan_documents_detailed(
        &self,
        items: Vec<DocumentItem>,
        selection: &RuleSelection,
    ) -> Result<DetailedScanReport> {
        self.run_documents(items, selection).await
    }

    async fn run_documents<R: DocumentOutcome>(
        &self,
        items: Vec<DocumentItem>,
        selection: &RuleSelection,
    ) -> Result<BatchReport<R>> {
        if items.is_empty() {
            return Err(SiftError::Validation("No documents to scan".to_string()));
        }
        let rules = self.registry.select(selection)?;

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();
        log_scan_start!(batch_id, "documents", items.len());
        if let Some(ref audit) = self.audit {
            audit.batch_started(batch_id, "documents", items.len());
        }

        let scanner = Arc::new(TextScanner::new(rules));
        let options = self.options;
        let outcomes: Vec<(String, std::result::Result<TextFindings, String>)> =
            stream::iter(items.into_iter().map(|item| {
                let scanner = Arc::clone(&scanner);
                let extractors = Arc::clone(&self.extractors);
                async move {
                    let name = item.name.clone();
                    let outcome = scan_document(item, scanner, extractors, options).await;
                    (name, outcome)
                }
            }))
            .buffered(options.max_concurrency)
            .collect()
            .await;

        let mut results = Vec::with_capacity(outcomes.len());
        for (name, outcome) in outcomes {
            match outcome {
                Ok(findings) => {
                    tracing::debug!(
                        item = %name,
                        matches = findings.total_matches(),
                        "Document scanned"
                    );
                    if let Some(ref audit) = self.audit {
                        audit.item_scanned(
                            batch_id,
                            &name,
                            findings.matches.iter().flat_map(|(pii_type, values)| {
                                values.iter().map(move |v| (pii_type.as_str(), v.as_str()))
                            }),
                        );
                    }
                    results.push(R::scanned(name, findings));
                }
                Err(error) => {
                    log_item_failed!(name, error);
                    if let Some(ref audit) = self.audit {
                        audit.item_failed(batch_id, &name, &error);
                    }
                    results.push(R::failed(name, error));
                }
            }
        }

        let report = BatchReport {
            batch_id,
            started_at,
            duration_ms: elapsed_ms(started),
            results,
        };
        let failed = report.failed_count();
        log_batch_complete!(batch_id, report.results.len(), failed, started.elapsed());
        if let Some(ref audit) = self.audit {
            audit.batch_completed(batch_id, report.results.len(), failed, report.duration_ms);
        }
        Ok(report)
    }

    /// Sample and scan one table or every table of a source
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Registry`] for unknown rule names,
    /// [`SiftError::Validation`] for a blank table name, and
    /// [`SiftError::DataAccess`] if listing tables fails. Per-table failures
    /// become failed outcomes.
    pub async fn scan_tables(
        &self,
        source: Arc<dyn TableSource>,
        target: TableTarget,
        selection: &RuleSelection,
    ) -> Result<TableScanReport> {
        let rules = self.registry.select(selection)?;
        let tables = resolve_tables(source.as_ref(), target).await?;

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();
        log_scan_start!(batch_id, "tables", tables.len());
        if let Some(ref audit) = self.audit {
            audit.batch_started(batch_id, "tables", tables.len());
        }

        let scanner = Arc::new(TabularScanner::new(rules));
        let budget = self.options.item_timeout;
        let outcomes: Vec<TableOutcome> = stream::iter(tables.into_iter().map(|table| {
            let scanner = Arc::clone(&scanner);
            let source = Arc::clone(&source);
            async move { scan_table(source, table, scanner, budget).await }
        }))
        .buffered(self.options.max_concurrency)
        .collect()
        .await;

        for outcome in &outcomes {
            match outcome {
                TableOutcome::Scanned {
                    table,
                    row_count,
                    records,
                    ..
                } => {
                    tracing::debug!(
                        table = %table,
                        rows = row_count,
                        matches = records.len(),
                        "Table scanned"
                    );
                    if let Some(ref audit) = self.audit {
                        audit.item_scanned(
                            batch_id,
                            table,
                            records
                                .iter()
                                .map(|r| (r.pii_type.as_str(), r.value.as_str())),
                        );
                    }
                }
                TableOutcome::Failed { table, error } => {
                    log_item_failed!(table, error);
                    if let Some(ref audit) = self.audit {
                        audit.item_failed(batch_id, table, error);
                    }
                }
            }
        }

        let report = TableScanReport {
            batch_id,
            database: source.database_name().to_string(),
            started_at,
            duration_ms: elapsed_ms(started),
            tables: outcomes,
        };
        let failed = report.failures().len();
        log_batch_complete!(batch_id, report.tables.len(), failed, started.elapsed());
        if let Some(ref audit) = self.audit {
            audit.batch_completed(batch_id, report.tables.len(), failed, report.duration_ms);
        }
        Ok(report)
    }

    /// Infer a PII type for every column of every table from column names
    ///
    /// # Errors
    ///
    /// Returns an error for unknown rule names or if listing tables fails.
    pub async fn classify_columns(
        &self,
        source: Arc<dyn TableSource>,
        selection: &RuleSelection,
    ) -> Result<Vec<TableClassification>> {
        let rules = self.registry.select(selection)?;
        let tables = source.list_tables().await?;
        tracing::info!(tables = tables.len(), "Classifying columns");

        let classifications = stream::iter(tables.into_iter().map(|table| {
            let source = Arc::clone(&source);
            let rules = rules.clone();
            async move { classify_table(source.as_ref(), table, &rules).await }
        }))
        .buffered(self.options.max_concurrency)
        .collect()
        .await;

        Ok(classifications)
    }
}

async fn resolve_tables(source: &dyn TableSource, target: TableTarget) -> Result<Vec<String>> {
    match target {
        TableTarget::Table(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(SiftError::Validation("Table name cannot be empty".to_string()));
            }
            Ok(vec![name])
        }
        TableTarget::All => Ok(source.list_tables().await?),
    }
}

async fn scan_document(
    item: DocumentItem,
    scanner: Arc<TextScanner>,
    extractors: Arc<ExtractorRegistry>,
    options: ScanOptions,
) -> std::result::Result<TextFindings, String> {
    let DocumentItem { name, content } = item;
    let bytes = load_content(content, options.max_file_size_bytes).await?;

    let task = tokio::task::spawn_blocking(move || -> std::result::Result<TextFindings, String> {
        let extracted = extractors
            .extract(&name, &bytes)
            .map_err(|e| e.to_string())?;
        Ok(scanner.scan(&extracted.text))
    });

    with_budget(options.item_timeout, join_blocking(task)).await
}

/// Bytes of a document, refusing anything above `limit` before it is read
async fn load_content(
    content: DocumentContent,
    limit: usize,
) -> std::result::Result<Vec<u8>, String> {
    let bytes = match content {
        DocumentContent::Bytes(bytes) => bytes,
        DocumentContent::Unreadable(error) => return Err(error),
        DocumentContent::File(path) => {
            let read_error = |e: std::io::Error| format!("Failed to read {}: {}", path.display(), e);
            let metadata = tokio::fs::metadata(&path).await.map_err(read_error)?;
            let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
            if size > limit {
                return Err(size_exceeded(size, limit));
            }
            tokio::fs::read(&path).await.map_err(read_error)?
        }
    };

    // A file may have grown between the metadata check and the read
    if bytes.len() > limit {
        return Err(size_exceeded(bytes.len(), limit));
    }
    Ok(bytes)
}

fn size_exceeded(size: usize, limit: usize) -> String {
    format!("File size {size} bytes exceeds limit of {limit} bytes")
}

async fn scan_table(
    source: Arc<dyn TableSource>,
    table: String,
    scanner: Arc<TabularScanner>,
    budget: Duration,
) -> TableOutcome {
    let work = async {
        let sample = source
            .fetch_sample(&table)
            .await
            .map_err(|e| e.to_string())?;
        let task = tokio::task::spawn_blocking(move || {
            let records = scanner.scan(&sample);
            Ok::<(RowSample, Vec<TableMatch>), String>((sample, records))
        });
        join_blocking(task).await
    };

    match with_budget(budget, work).await {
        Ok((sample, records)) => TableOutcome::Scanned {
            table,
            row_count: sample.row_count(),
            columns: sample.columns,
            records,
        },
        Err(error) => TableOutcome::Failed { table, error },
    }
}

async fn classify_table(source: &dyn TableSource, table: String, rules: &RuleSet) -> TableClassification {
    match source.describe_table(&table).await {
        Ok(columns) => TableClassification::Classified {
            columns: columns
                .into_iter()
                .map(|column| ColumnClassification {
                    pii_type: classify_column_name(&column.name, rules),
                    name: column.name,
                    data_type: column.data_type,
                })
                .collect(),
            table,
        },
        Err(e) => {
            log_item_failed!(table, e);
            TableClassification::Failed {
                table,
                error: e.to_string(),
            }
        }
    }
}

/// Bound an item's work; a blocking task that overruns keeps running
/// detached but its result is discarded
async fn with_budget<T, F>(budget: Duration, work: F) -> std::result::Result<T, String>
where
    F: std::future::Future<Output = std::result::Result<T, String>>,
{
    tokio::time::timeout(budget, work)
        .await
        .unwrap_or_else(|_| Err(format!("Scan exceeded time limit of {}s", budget.as_secs())))
}

async fn join_blocking<T>(
    task: JoinHandle<std::result::Result<T, String>>,
) -> std::result::Result<T, String> {
    task.await.unwrap_or_else(|e| Err(describe_join_error(e)))
}

fn describe_join_error(error: JoinError) -> String {
    if !error.is_panic() {
        return format!("Scan task was cancelled: {error}");
    }

    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("Scanner panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("Scanner panicked: {message}")
    } else {
        "Scanner panicked".to_string()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::InMemoryTableSource;
    use crate::core::scan::report::{DetailedDocumentResult, DocumentResult};
    use crate::domain::errors::{ExtractionError, RegistryError};
    use crate::extract::{Extractor, SourceFormat};
    use std::collections::BTreeMap;

    struct PanickingExtractor;

    impl Extractor for PanickingExtractor {
        fn extract(&self, _bytes: &[u8]) -> std::result::Result<String, ExtractionError> {
            panic!("parser blew up")
        }
    }

    struct SlowExtractor;

    impl Extractor for SlowExtractor {
        fn extract(&self, _bytes: &[u8]) -> std::result::Result<String, ExtractionError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(String::new())
        }
    }

    fn orchestrator() -> ScanOrchestrator {
        ScanOrchestrator::new(Arc::new(PatternRegistry::default_patterns().unwrap()))
    }

    fn selection(names: &[&str]) -> RuleSelection {
        RuleSelection::from_names(names.iter().copied())
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let result = orchestrator().scan_documents(Vec::new(), &RuleSelection::all()).await;
        assert!(matches!(result, Err(SiftError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_rule_is_rejected() {
        let items = vec![DocumentItem::new("a.txt", "hello")];
        let result = orchestrator()
            .scan_documents(items, &selection(&["email", "iban"]))
            .await;
        assert!(matches!(
            result,
            Err(SiftError::Registry(RegistryError::UnknownRule(ref names))) if names == &["iban".to_string()]
        ));
    }

    #[tokio::test]
    async fn test_results_keep_submission_order() {
        let items: Vec<DocumentItem> = (0..12)
            .map(|i| DocumentItem::new(format!("doc{i}.txt"), format!("user{i}@example.com")))
            .collect();

        let report = orchestrator()
            .with_options(ScanOptions {
                max_concurrency: 3,
                ..ScanOptions::default()
            })
            .scan_documents(items, &selection(&["email"]))
            .await
            .unwrap();

        let names: Vec<&str> = report.results.iter().map(|r| r.file_name()).collect();
        let expected: Vec<String> = (0..12).map(|i| format!("doc{i}.txt")).collect();
        assert_eq!(names, expected);
        assert!(!report.has_failures());
    }

    #[tokio::test]
    async fn test_contact_document_summary() {
        let items = vec![DocumentItem::new(
            "contact.txt",
            "Contact: john.doe@example.com\nCall +1 415-555-0100",
        )];
        let report = orchestrator()
            .scan_documents_detailed(items, &selection(&["email", "phone"]))
            .await
            .unwrap();

        let DetailedDocumentResult::Scanned {
            pii_found,
            matches,
            locations,
            ..
        } = &report.results[0]
        else {
            panic!("expected a scanned result");
        };
        assert!(*pii_found);
        assert_eq!(matches["email"], vec!["john.doe@example.com"]);
        assert_eq!(matches["phone"].len(), 1);
        assert_eq!(locations["email"], vec!["Line 1"]);
        assert_eq!(locations["phone"], vec!["Line 2"]);
    }

    #[tokio::test]
    async fn test_panicking_extractor_is_isolated() {
        let mut extractors = ExtractorRegistry::with_defaults();
        extractors.register(SourceFormat::Pdf, PanickingExtractor);

        let items = vec![
            DocumentItem::new("a.txt", "a@example.com"),
            DocumentItem::new("b.pdf", vec![1u8, 2, 3]),
            DocumentItem::new("c.txt", "c@example.com"),
        ];
        let report = orchestrator()
            .with_extractors(extractors)
            .scan_documents(items, &RuleSelection::all())
            .await
            .unwrap();

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.failed_count(), 1);
        let error = report.results[1].error().unwrap();
        assert!(error.contains("parser blew up"));
    }

    #[tokio::test]
    async fn test_overlong_item_times_out() {
        let mut extractors = ExtractorRegistry::with_defaults();
        extractors.register(SourceFormat::Pdf, SlowExtractor);

        let report = orchestrator()
            .with_extractors(extractors)
            .with_options(ScanOptions {
                item_timeout: Duration::from_millis(50),
                ..ScanOptions::default()
            })
            .scan_documents(vec![DocumentItem::new("slow.pdf", "x")], &RuleSelection::all())
            .await
            .unwrap();

        assert!(report.results[0].error().unwrap().contains("time limit"));
    }

    #[tokio::test]
    async fn test_oversized_and_unreadable_items_fail() {
        let items = vec![
            DocumentItem::new("big.txt", vec![b'a'; 64]),
            DocumentItem::unreadable("gone.txt", "Failed to read gone.txt: not found"),
        ];
        let report = orchestrator()
            .with_options(ScanOptions {
                max_file_size_bytes: 16,
                ..ScanOptions::default()
            })
            .scan_documents(items, &RuleSelection::all())
            .await
            .unwrap();

        assert!(report.results[0].error().unwrap().contains("exceeds limit"));
        assert_eq!(
            report.results[1],
            DocumentResult::Failed {
                file_name: "gone.txt".to_string(),
                error: "Failed to read gone.txt: not found".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_completes() {
        let orchestrator = orchestrator().with_options(ScanOptions {
            max_concurrency: 0,
            ..ScanOptions::default()
        });
        assert_eq!(orchestrator.options().max_concurrency, 1);

        let items = vec![
            DocumentItem::new("a.txt", "a@example.com"),
            DocumentItem::new("b.txt", "b@example.com"),
        ];
        let report = tokio::time::timeout(
            Duration::from_secs(5),
            orchestrator.scan_documents(items, &selection(&["email"])),
        )
        .await
        .expect("batch did not finish")
        .unwrap();
        assert_eq!(report.results.len(), 2);

        let source: Arc<dyn TableSource> = Arc::new(InMemoryTableSource::new("hr").with_table(
            RowSample::new("contacts", vec!["email".to_string()]).with_row([Some("c@example.com")]),
        ));
        let tables = tokio::time::timeout(
            Duration::from_secs(5),
            orchestrator.scan_tables(source, TableTarget::All, &RuleSelection::all()),
        )
        .await
        .expect("table batch did not finish")
        .unwrap();
        assert_eq!(tables.tables.len(), 1);
    }

    #[tokio::test]
    async fn test_files_are_size_checked_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("small.txt");
        let large = dir.path().join("large.txt");
        std::fs::write(&small, "jane@example.com").unwrap();
        std::fs::write(&large, vec![b'a'; 4096]).unwrap();

        let items = vec![
            DocumentItem::from_path(&small),
            DocumentItem::from_path(&large),
            DocumentItem::from_path(dir.path().join("missing.txt")),
        ];
        assert_eq!(items[1].name(), "large.txt");

        let report = orchestrator()
            .with_options(ScanOptions {
                max_file_size_bytes: 1024,
                ..ScanOptions::default()
            })
            .scan_documents(items, &selection(&["email"]))
            .await
            .unwrap();

        assert_eq!(
            report.results[0],
            DocumentResult::Scanned {
                file_name: "small.txt".to_string(),
                pii_found: true,
                classifications: BTreeMap::from([("email".to_string(), 1)]),
            }
        );
        assert_eq!(
            report.results[1].error(),
            Some("File size 4096 bytes exceeds limit of 1024 bytes")
        );
        assert!(report.results[2].error().unwrap().starts_with("Failed to read"));
    }

    #[tokio::test]
    async fn test_unsupported_format_is_empty_not_failed() {
        let report = orchestrator()
            .scan_documents(
                vec![DocumentItem::new("photo.png", "jane@example.com")],
                &RuleSelection::all(),
            )
            .await
            .unwrap();

        assert_eq!(
            report.results[0],
            DocumentResult::Scanned {
                file_name: "photo.png".to_string(),
                pii_found: false,
                classifications: BTreeMap::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_scan_single_table() {
        let source: Arc<dyn TableSource> = Arc::new(
            InMemoryTableSource::new("hr").with_table(
                RowSample::new("staff", vec!["id".to_string(), "ssn".to_string()])
                    .with_row([Some("1"), Some("123-45-6789")]),
            ),
        );

        let report = orchestrator()
            .scan_tables(source, TableTarget::Table("staff".to_string()), &selection(&["ssn"]))
            .await
            .unwrap();

        assert_eq!(report.database, "hr");
        assert_eq!(
            report.into_records(),
            vec![TableMatch {
                table: "staff".to_string(),
                column: "ssn".to_string(),
                value: "123-45-6789".to_string(),
                pii_type: "ssn".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_scan_all_tables_isolates_failures() {
        let source: Arc<dyn TableSource> = Arc::new(
            InMemoryTableSource::new("hr")
                .with_table(
                    RowSample::new("contacts", vec!["email".to_string()])
                        .with_row([Some("a@example.com")]),
                )
                .with_failing_table("ledger", "permission denied"),
        );

        let report = orchestrator()
            .scan_tables(source, TableTarget::All, &RuleSelection::all())
            .await
            .unwrap();

        assert_eq!(report.tables.len(), 2);
        assert_eq!(report.tables[0].table(), "contacts");
        assert_eq!(
            report.failures(),
            vec![("ledger", "Query failed: permission denied")]
        );
        assert!(report.records().any(|r| r.pii_type == "email"));
    }

    #[tokio::test]
    async fn test_blank_table_name_is_rejected() {
        let source: Arc<dyn TableSource> = Arc::new(InMemoryTableSource::new("hr"));
        let result = orchestrator()
            .scan_tables(source, TableTarget::Table("  ".to_string()), &RuleSelection::all())
            .await;
        assert!(matches!(result, Err(SiftError::Validation(_))));
    }

    #[tokio::test]
    async fn test_classify_columns() {
        let source: Arc<dyn TableSource> = Arc::new(
            InMemoryTableSource::new("crm").with_table(RowSample::new(
                "customers",
                vec!["id".to_string(), "customer_email".to_string()],
            )),
        );

        let classified = orchestrator()
            .classify_columns(source, &RuleSelection::all())
            .await
            .unwrap();

        let TableClassification::Classified { table, columns } = &classified[0] else {
            panic!("expected a classified table");
        };
        assert_eq!(table, "customers");
        assert_eq!(columns[0].pii_type, None);
        assert_eq!(columns[1].pii_type.as_deref(), Some("email"));
        assert_eq!(columns[1].data_type, "text");
    }
}
