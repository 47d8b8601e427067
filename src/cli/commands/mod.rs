//! CLI command implementations
//!
//! Scan commands print JSON on stdout; diagnostics go to stderr. Exit codes:
//! `0` success, `1` at least one item failed, `2` configuration or input
//! error, `5` fatal.

pub mod classify;
pub mod init;
pub mod rules;
pub mod scan_db;
pub mod scan_files;
pub mod validate;

use crate::config::{load_config, parse_config, SiftConfig};
use crate::detection::RuleSelection;
use crate::domain::SiftError;
use serde::Serialize;
use std::path::Path;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "sift.toml";

/// Load the configuration file, or built-in defaults (plus `SIFT_*`
/// overrides) when no path is given and `sift.toml` does not exist
pub fn load_settings(config_path: Option<&str>) -> crate::domain::Result<SiftConfig> {
    match config_path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => parse_config(""),
    }
}

/// Rule selection from `--pii-types`, falling back to `scan.pii_types`
pub fn selection_for(pii_types: &[String], config: &SiftConfig) -> RuleSelection {
    if pii_types.is_empty() {
        RuleSelection::from_names(&config.scan.pii_types)
    } else {
        RuleSelection::from_names(pii_types)
    }
}

/// Exit code for an error that aborted a command
pub fn exit_code_for(error: &SiftError) -> i32 {
    match error {
        SiftError::Configuration(_) | SiftError::Registry(_) | SiftError::Validation(_) => 2,
        _ => 5,
    }
}

/// Write a value to stdout as JSON
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}

/// Report an aborting error on stderr and return its exit code
pub fn fail(context: &str, error: &SiftError) -> i32 {
    crate::log_error_with_context!(error, context);
    eprintln!("Error: {context}: {error}");
    exit_code_for(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataAccessError, RegistryError};

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&SiftError::Configuration("x".into())), 2);
        assert_eq!(
            exit_code_for(&RegistryError::UnknownRule(vec!["iban".into()]).into()),
            2
        );
        assert_eq!(exit_code_for(&SiftError::Validation("x".into())), 2);
        assert_eq!(
            exit_code_for(&DataAccessError::ConnectionFailed("x".into()).into()),
            5
        );
    }

    #[test]
    fn test_selection_prefers_cli_types() {
        let mut config = SiftConfig::default();
        config.scan.pii_types = vec!["email".to_string()];

        let from_config = selection_for(&[], &config);
        assert_eq!(from_config.names().collect::<Vec<_>>(), vec!["email"]);

        let from_cli = selection_for(&["ssn".to_string(), "pan".to_string()], &config);
        assert_eq!(from_cli.names().collect::<Vec<_>>(), vec!["pan", "ssn"]);
    }
}
