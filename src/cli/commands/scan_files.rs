//! Scan files command implementation
//!
//! This module implements the `scan-files` command, which scans local
//! documents and prints one JSON entry per file.

use super::{fail, load_settings, print_json, selection_for};
use crate::core::scan::{DocumentItem, ScanOrchestrator};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the scan-files command
#[derive(Args, Debug)]
pub struct ScanFilesArgs {
    /// Documents to scan
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Comma-separated PII types (default: scan.pii_types, or all rules)
    #[arg(long, value_delimiter = ',')]
    pub pii_types: Vec<String>,

    /// Report matched values and line locations instead of counts
    #[arg(long)]
    pub detailed: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ScanFilesArgs {
    /// Execute the scan-files command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let config = match load_settings(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(fail("Failed to load configuration", &e)),
        };
        let orchestrator = match ScanOrchestrator::from_config(&config) {
            Ok(o) => o,
            Err(e) => return Ok(fail("Failed to initialize scanner", &e)),
        };
        let selection = selection_for(&self.pii_types, &config);

        tracing::info!(files = self.paths.len(), detailed = self.detailed, "Scanning files");

        let items: Vec<DocumentItem> = self
            .paths
            .iter()
            .cloned()
            .map(DocumentItem::from_path)
            .collect();

        let has_failures = if self.detailed {
            match orchestrator.scan_documents_detailed(items, &selection).await {
                Ok(report) => {
                    print_json(&report.results, self.pretty)?;
                    report.has_failures()
                }
                Err(e) => return Ok(fail("Scan rejected", &e)),
            }
        } else {
            match orchestrator.scan_documents(items, &selection).await {
                Ok(report) => {
                    print_json(&report.results, self.pretty)?;
                    report.has_failures()
                }
                Err(e) => return Ok(fail("Scan rejected", &e)),
            }
        };

        Ok(if has_failures { 1 } else { 0 })
    }
}
