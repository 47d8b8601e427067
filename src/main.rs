// Sift - PII discovery for documents and relational tables
// Copyright (c) 2025 Sift Contributors
// Licensed under the MIT License

use clap::Parser;
use sift::cli::commands::load_settings;
use sift::cli::{Cli, Commands};
use sift::config::LoggingConfig;
use sift::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging follows the configuration when it loads; otherwise console only.
    // Commands report configuration errors themselves.
    let (config_level, logging_config) = match load_settings(cli.config.as_deref()) {
        Ok(config) => (config.application.log_level, config.logging),
        Err(_) => (
            "info".to_string(),
            LoggingConfig {
                local_enabled: false,
                ..LoggingConfig::default()
            },
        ),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Sift starting");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::ScanFiles(args) => args.execute(config_path).await,
        Commands::ScanDb(args) => args.execute(config_path).await,
        Commands::ClassifyColumns(args) => args.execute(config_path).await,
        Commands::ListRules(args) => args.execute(config_path).await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
    }
}
