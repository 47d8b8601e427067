//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Sift using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Sift - PII discovery for documents and database tables
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
#[command(author = "Sift Contributors")]
pub struct Cli {
    /// Path to configuration file (default: sift.toml if present)
    #[arg(short, long, env = "SIFT_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SIFT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan documents for PII
    ScanFiles(commands::scan_files::ScanFilesArgs),

    /// Sample and scan database tables for PII
    ScanDb(commands::scan_db::ScanDbArgs),

    /// Infer PII types from column names
    ClassifyColumns(commands::classify::ClassifyArgs),

    /// List the registered PII rules
    ListRules(commands::rules::ListRulesArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_scan_files() {
        let cli = Cli::parse_from([
            "sift",
            "scan-files",
            "a.pdf",
            "b.docx",
            "--pii-types",
            "email,phone",
            "--detailed",
        ]);
        assert!(cli.config.is_none());
        let Commands::ScanFiles(args) = cli.command else {
            panic!("expected scan-files");
        };
        assert_eq!(args.paths.len(), 2);
        assert_eq!(args.pii_types, vec!["email", "phone"]);
        assert!(args.detailed);
    }

    #[test]
    fn test_cli_scan_files_requires_paths() {
        assert!(Cli::try_parse_from(["sift", "scan-files"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["sift", "--config", "custom.toml", "list-rules"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["sift", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(ref a) if !a.check_connection));

        let cli = Cli::parse_from(["sift", "validate-config", "--check-connection"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(ref a) if a.check_connection));
    }

    #[test]
    fn test_cli_scan_db_table_or_all() {
        let cli = Cli::parse_from(["sift", "scan-db", "--table", "users", "--summary"]);
        assert!(matches!(cli.command, Commands::ScanDb(ref a) if a.table.as_deref() == Some("users") && a.summary));

        let cli = Cli::parse_from(["sift", "scan-db", "--all"]);
        assert!(matches!(cli.command, Commands::ScanDb(ref a) if a.all));

        assert!(Cli::try_parse_from(["sift", "scan-db"]).is_err());
        assert!(Cli::try_parse_from(["sift", "scan-db", "--table", "a", "--all"]).is_err());
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["sift", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
