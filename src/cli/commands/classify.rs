//! Classify columns command implementation
//!
//! This module implements the `classify-columns` command, which infers a PII
//! type for every column from its name without reading any rows.

use super::{fail, load_settings, print_json, selection_for};
use crate::adapters::database::create_table_source;
use crate::core::scan::{ScanOrchestrator, TableClassification};
use crate::domain::SiftError;
use clap::Args;

/// Arguments for the classify-columns command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Comma-separated PII types considered (default: scan.pii_types, or all rules)
    #[arg(long, value_delimiter = ',')]
    pub pii_types: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ClassifyArgs {
    /// Execute the classify-columns command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let config = match load_settings(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(fail("Failed to load configuration", &e)),
        };
        let Some(ref database) = config.database else {
            let error = SiftError::Configuration("No [database] section configured".to_string());
            return Ok(fail("Database not configured", &error));
        };
        let orchestrator = match ScanOrchestrator::from_config(&config) {
            Ok(o) => o,
            Err(e) => return Ok(fail("Failed to initialize scanner", &e)),
        };
        let source = match create_table_source(database).await {
            Ok(s) => s,
            Err(e) => return Ok(fail("Failed to create table source", &e)),
        };
        let selection = selection_for(&self.pii_types, &config);

        let classifications = match orchestrator.classify_columns(source, &selection).await {
            Ok(c) => c,
            Err(e) => return Ok(fail("Column classification failed", &e)),
        };

        let has_failures = classifications
            .iter()
            .any(|c| matches!(c, TableClassification::Failed { .. }));
        print_json(&classifications, self.pretty)?;

        Ok(if has_failures { 1 } else { 0 })
    }
}
