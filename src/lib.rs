// Sift - PII discovery for documents and relational tables
// Copyright (c) 2025 Sift Contributors
// Licensed under the MIT License

//! # Sift - PII discovery for documents and relational tables
//!
//! Sift finds personally identifiable information in uploaded documents and
//! in rows sampled from database tables. Sources are normalized to plain text
//! or stringified cell values and matched against a registry of named
//! regular-expression rules.
//!
//! ## Architecture
//!
//! Sift follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Batch orchestration, reports and the audit trail
//! - [`detection`] - Pattern registry and the text and tabular scanners
//! - [`extract`] - Format extractors (PDF, Office, delimited, markup, ...)
//! - [`adapters`] - Table sources (PostgreSQL, in-memory)
//! - [`domain`] - Error types and shared value types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sift::core::scan::{DocumentItem, ScanOrchestrator};
//! use sift::detection::{PatternRegistry, RuleSelection};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(PatternRegistry::default_patterns()?);
//!     let orchestrator = ScanOrchestrator::new(registry);
//!
//!     let bytes = std::fs::read("contract.docx")?;
//!     let report = orchestrator
//!         .scan_documents(
//!             vec![DocumentItem::new("contract.docx", bytes)],
//!             &RuleSelection::all(),
//!         )
//!         .await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&report.results)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Text Scanning
//!
//! Text is scanned line by line. Each rule contributes every non-overlapping
//! match, and one `"Line N"` location per line with at least one match:
//!
//! ```rust
//! use sift::detection::{PatternRegistry, RuleSelection, TextScanner};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = PatternRegistry::default_patterns()?;
//! let rules = registry.select(&RuleSelection::parse_list("email,phone"))?;
//! let findings = TextScanner::new(rules)
//!     .scan("Contact: john.doe@example.com\nCall +1 415-555-0100");
//!
//! assert_eq!(findings.locations["email"], vec!["Line 1"]);
//! assert_eq!(findings.locations["phone"], vec!["Line 2"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Table Scanning
//!
//! Tables are read through the [`adapters::database::TableSource`] trait,
//! which returns bounded samples with every value rendered as text. Each
//! matching cell yields one `{ table, column, value, pii_type }` record.
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], whose error is
//! [`domain::SiftError`]. Inside a batch, item failures are reported per
//! item and never abort the batch.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod detection;
pub mod domain;
pub mod extract;
pub mod logging;
