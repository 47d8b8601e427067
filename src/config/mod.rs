//! Configuration management for Sift.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Sift uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SIFT_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sift::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("sift.toml")?;
//!
//! println!("Concurrency: {}", config.scan.max_concurrency);
//! if let Some(database) = &config.database {
//!     println!("Schema: {}", database.schema);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ScanConfig`] - Concurrency, time budget, size limit, pattern library
//! - [`DatabaseConfig`] - PostgreSQL connection for table scans
//! - [`AuditConfig`] - Hashed audit trail of findings
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [scan]
//! max_concurrency = 4
//! item_timeout_seconds = 60
//! pii_types = ["email", "phone", "ssn"]
//!
//! [database]
//! connection_string = "${SIFT_DB_URL}"
//! schema = "public"
//! row_limit = 1000
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, AuditConfig, DatabaseConfig, LoggingConfig, ScanConfig, SiftConfig,
};
pub use secret::{
    redact_connection_string, secret_string, secret_string_opt, SecretString, SecretValue,
};
