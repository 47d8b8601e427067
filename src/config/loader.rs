//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseConfig, SiftConfig};
use super::secret::secret_string;
use crate::domain::errors::SiftError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SiftConfig
/// 4. Applies environment variable overrides (SIFT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use sift::config::loader::load_config;
///
/// let config = load_config("sift.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SiftConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SiftError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SiftError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text, applying substitution, overrides and
/// validation exactly as [`load_config`] does
pub fn parse_config(contents: &str) -> Result<SiftConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: SiftConfig = toml::from_str(&contents)
        .map_err(|e| SiftError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SiftError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported
/// together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SiftError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(SiftError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        SiftError::Configuration(format!("Invalid value '{value}' for environment variable {name}"))
    })
}

/// Applies environment variable overrides using SIFT_* prefix
///
/// Environment variables follow the pattern: SIFT_<SECTION>_<KEY>
/// For example: SIFT_SCAN_MAX_CONCURRENCY, SIFT_DATABASE_ROW_LIMIT
fn apply_env_overrides(config: &mut SiftConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("SIFT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Scan overrides
    if let Ok(val) = std::env::var("SIFT_SCAN_MAX_CONCURRENCY") {
        config.scan.max_concurrency = parse_override("SIFT_SCAN_MAX_CONCURRENCY", &val)?;
    }
    if let Ok(val) = std::env::var("SIFT_SCAN_ITEM_TIMEOUT_SECONDS") {
        config.scan.item_timeout_seconds = parse_override("SIFT_SCAN_ITEM_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("SIFT_SCAN_MAX_FILE_SIZE_MB") {
        config.scan.max_file_size_mb = parse_override("SIFT_SCAN_MAX_FILE_SIZE_MB", &val)?;
    }
    if let Ok(val) = std::env::var("SIFT_SCAN_PATTERN_LIBRARY") {
        config.scan.pattern_library = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("SIFT_SCAN_PII_TYPES") {
        config.scan.pii_types = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    // Database overrides; a connection string alone is enough to enable table scans
    if let Ok(val) = std::env::var("SIFT_DATABASE_CONNECTION_STRING") {
        match config.database {
            Some(ref mut database) => database.connection_string = secret_string(val),
            None => {
                config.database = Some(DatabaseConfig::from_connection_string(val));
            }
        }
    }
    if let Some(ref mut database) = config.database {
        if let Ok(val) = std::env::var("SIFT_DATABASE_SCHEMA") {
            database.schema = val;
        }
        if let Ok(val) = std::env::var("SIFT_DATABASE_ROW_LIMIT") {
            database.row_limit = parse_override("SIFT_DATABASE_ROW_LIMIT", &val)?;
        }
        if let Ok(val) = std::env::var("SIFT_DATABASE_MAX_CONNECTIONS") {
            database.max_connections = parse_override("SIFT_DATABASE_MAX_CONNECTIONS", &val)?;
        }
        if let Ok(val) = std::env::var("SIFT_DATABASE_SSL_MODE") {
            database.ssl_mode = val;
        }
    }

    // Audit overrides
    if let Ok(val) = std::env::var("SIFT_AUDIT_ENABLED") {
        config.audit.enabled = parse_override("SIFT_AUDIT_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("SIFT_AUDIT_LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SIFT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("SIFT_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("SIFT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("SIFT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SIFT_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${SIFT_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"");
        std::env::remove_var("SIFT_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_reports_all_missing() {
        std::env::remove_var("SIFT_LOADER_MISSING_A");
        std::env::remove_var("SIFT_LOADER_MISSING_B");
        let input = "a = \"${SIFT_LOADER_MISSING_A}\"\nb = \"${SIFT_LOADER_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("SIFT_LOADER_MISSING_A"));
        assert!(message.contains("SIFT_LOADER_MISSING_B"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("SIFT_LOADER_COMMENTED");
        let input = "# password = \"${SIFT_LOADER_COMMENTED}\"\nname = \"x\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(SiftError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[scan]
max_concurrency = 8
pii_types = ["email", "ssn"]

[database]
connection_string = "postgresql://scanner:pw@localhost:5432/hr"
schema = "staff"
row_limit = 250
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.scan.max_concurrency, 8);
        assert_eq!(config.scan.pii_types, vec!["email", "ssn"]);

        let database = config.database.unwrap();
        assert_eq!(database.schema, "staff");
        assert_eq!(database.row_limit, 250);
        assert_eq!(database.ssl_mode, "prefer");
        assert_eq!(
            database.connection_string.expose_secret(),
            "postgresql://scanner:pw@localhost:5432/hr"
        );
    }

    #[test]
    fn test_parse_config_empty_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.scan.max_file_size_mb, 50);
        assert!(config.scan.pii_types.is_empty());
    }

    #[test]
    fn test_parse_config_rejects_invalid_values() {
        let err = parse_config("[scan]\nmax_concurrency = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_concurrency"));
    }
}
