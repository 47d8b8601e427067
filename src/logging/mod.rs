//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output on stderr
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! Matched values are never written to logs. Events carry item names, rule
//! names and counts only.
//!
//! # Example
//!
//! ```no_run
//! use sift::logging::init_logging;
//! use sift::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Scan started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a scan batch
///
/// # Example
///
/// ```no_run
/// use sift::log_scan_start;
///
/// let batch_id = "6f1c0c2e";
/// log_scan_start!(batch_id, "documents", 3);
/// ```
#[macro_export]
macro_rules! log_scan_start {
    ($batch_id:expr, $kind:expr, $items:expr) => {
        tracing::info!(
            batch_id = %$batch_id,
            kind = $kind,
            items = $items,
            "Starting scan"
        );
    };
}

/// Log an item that could not be scanned
///
/// # Example
///
/// ```no_run
/// use sift::log_item_failed;
///
/// log_item_failed!("contract.docx", "missing part word/document.xml");
/// ```
#[macro_export]
macro_rules! log_item_failed {
    ($item:expr, $error:expr) => {
        tracing::warn!(
            item = %$item,
            error = %$error,
            "Item failed"
        );
    };
}

/// Log the completion of a scan batch
///
/// # Example
///
/// ```no_run
/// use sift::log_batch_complete;
/// use std::time::Duration;
///
/// log_batch_complete!("6f1c0c2e", 10, 1, Duration::from_millis(420));
/// ```
#[macro_export]
macro_rules! log_batch_complete {
    ($batch_id:expr, $total:expr, $failed:expr, $duration:expr) => {
        tracing::info!(
            batch_id = %$batch_id,
            total = $total,
            failed = $failed,
            duration_ms = $duration.as_millis() as u64,
            "Scan completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use sift::log_error_with_context;
/// use sift::domain::SiftError;
///
/// let error = SiftError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
