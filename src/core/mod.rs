//! Core business logic for Sift.
//!
//! # Modules
//!
//! - [`scan`] - Batch orchestration, reports, table summaries and the audit trail
//!
//! # Scan Workflow
//!
//! 1. **Select rules**: resolve the requested PII types against the registry
//! 2. **Normalize**: extract text from each document, or sample each table
//! 3. **Match**: run the selected rules line by line or cell by cell
//! 4. **Report**: one entry per item, in submission order
//! 5. **Audit** (optional): append hashed findings to the audit trail

pub mod scan;
