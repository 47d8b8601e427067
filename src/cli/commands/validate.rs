//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Sift configuration file and its pattern library.

use super::{exit_code_for, load_settings, DEFAULT_CONFIG_PATH};
use crate::adapters::database::{create_table_source, TableSource};
use crate::config::redact_connection_string;
use crate::detection::{PatternRegistry, RuleSelection};
use crate::domain::SiftError;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Also connect to the configured database
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let shown_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        tracing::info!(config_path = %shown_path, "Validating configuration");

        println!("🔍 Validating configuration file: {shown_path}");
        println!();

        let config = match load_settings(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded and validated");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let registry = match config.scan.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        };
        let registry = match registry {
            Ok(r) => {
                println!("✅ Pattern library compiled ({} rules)", r.len());
                r
            }
            Err(e) => {
                println!("❌ Pattern library is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = registry.select(&RuleSelection::from_names(&config.scan.pii_types)) {
            println!("❌ scan.pii_types is invalid");
            println!("   Error: {e}");
            return Ok(2);
        }

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Max Concurrency: {}", config.scan.max_concurrency);
        println!("  Item Timeout: {}s", config.scan.item_timeout_seconds);
        println!("  Max File Size: {} MB", config.scan.max_file_size_mb);
        if config.scan.pii_types.is_empty() {
            println!("  PII Types: all ({})", registry.len());
        } else {
            println!("  PII Types: {}", config.scan.pii_types.join(", "));
        }
        match config.database {
            Some(ref database) => {
                println!(
                    "  Database: {}",
                    redact_connection_string(&database.connection_string)
                );
                println!("  Schema: {}", database.schema);
                println!("  Row Limit: {}", database.row_limit);
                println!("  SSL Mode: {}", database.ssl_mode);
            }
            None => println!("  Database: not configured"),
        }
        if config.audit.enabled {
            println!("  Audit Log: {}", config.audit.log_path.display());
        }
        println!();

        if !self.check_connection {
            return Ok(0);
        }

        let Some(ref database) = config.database else {
            println!("❌ --check-connection requires a [database] section");
            return Ok(2);
        };
        let source = match create_table_source(database).await {
            Ok(source) => source,
            Err(e) => {
                println!("❌ Failed to create database client");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };
        Ok(check_connection(source.as_ref()).await)
    }
}

/// Connect to a table source and report the outcome; returns the exit code
async fn check_connection(source: &dyn TableSource) -> i32 {
    match source.test_connection().await {
        Ok(()) => {
            println!("✅ Connected to database {}", source.database_name());
            0
        }
        Err(e) => {
            println!("❌ Cannot connect to database {}", source.database_name());
            println!("   Error: {e}");
            exit_code_for(&SiftError::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::InMemoryTableSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_rejects_unknown_default_types() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scan]\npii_types = [\"email\", \"iban\"]").unwrap();

        let path = file.path().to_string_lossy().into_owned();
        assert_eq!(ValidateArgs::default().execute(Some(&path)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_validate_accepts_minimal_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scan]\npii_types = [\"email\"]").unwrap();

        let path = file.path().to_string_lossy().into_owned();
        assert_eq!(ValidateArgs::default().execute(Some(&path)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_check_connection_requires_database_section() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scan]\npii_types = [\"email\"]").unwrap();

        let path = file.path().to_string_lossy().into_owned();
        let args = ValidateArgs {
            check_connection: true,
        };
        assert_eq!(args.execute(Some(&path)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_check_connection_outcome() {
        let reachable = InMemoryTableSource::new("hr");
        assert_eq!(check_connection(&reachable).await, 0);

        let unreachable = InMemoryTableSource::new("hr").with_unreachable("connection refused");
        assert_eq!(check_connection(&unreachable).await, 5);
    }
}
