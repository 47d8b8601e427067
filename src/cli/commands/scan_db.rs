//! Scan database command implementation
//!
//! This module implements the `scan-db` command, which samples one table or
//! every table of the configured database and prints the match records.

use super::{fail, load_settings, print_json, selection_for};
use crate::adapters::database::create_table_source;
use crate::core::scan::{summarize_tables, ScanOrchestrator, TableTarget};
use crate::domain::SiftError;
use clap::Args;

/// Arguments for the scan-db command
#[derive(Args, Debug)]
pub struct ScanDbArgs {
    /// Table to scan
    #[arg(long, conflicts_with = "all", required_unless_present = "all")]
    pub table: Option<String>,

    /// Scan every table in the configured schema
    #[arg(long)]
    pub all: bool,

    /// Comma-separated PII types (default: scan.pii_types, or all rules)
    #[arg(long, value_delimiter = ',')]
    pub pii_types: Vec<String>,

    /// Print per-table summaries instead of match records
    #[arg(long)]
    pub summary: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ScanDbArgs {
    fn target(&self) -> TableTarget {
        match self.table {
            Some(ref table) if !self.all => TableTarget::Table(table.clone()),
            _ => TableTarget::All,
        }
    }

    /// Execute the scan-db command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let config = match load_settings(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(fail("Failed to load configuration", &e)),
        };
        let Some(ref database) = config.database else {
            let error = SiftError::Configuration(
                "No [database] section; set SIFT_DATABASE_CONNECTION_STRING or add one to the configuration file"
                    .to_string(),
            );
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

        let report = match orchestrator
            .scan_tables(source, self.target(), &selection)
            .await
        {
            Ok(r) => r,
            Err(e) => return Ok(fail("Table scan failed", &e)),
        };

        for (table, error) in report.failures() {
            eprintln!("Table {table} failed: {error}");
        }
        let has_failures = report.has_failures();

        if self.summary {
            let summary = summarize_tables(&report, orchestrator.registry());
            print_json(&summary, self.pretty)?;
        } else {
            print_json(&report.into_records(), self.pretty)?;
        }

        Ok(if has_failures { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(table: Option<&str>, all: bool) -> ScanDbArgs {
        ScanDbArgs {
            table: table.map(str::to_string),
            all,
            pii_types: Vec::new(),
            summary: false,
            pretty: false,
        }
    }

    #[test]
    fn test_target_selection() {
        assert_eq!(
            args(Some("users"), false).target(),
            TableTarget::Table("users".to_string())
        );
        assert_eq!(args(None, true).target(), TableTarget::All);
    }
}
