//! List rules command implementation

use super::{fail, load_settings, print_json};
use crate::detection::PatternRegistry;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

/// Arguments for the list-rules command
#[derive(Args, Debug)]
pub struct ListRulesArgs {
    /// Pattern library to list instead of the configured one
    #[arg(long)]
    pub pattern_library: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ListRulesArgs {
    fn load_registry(&self, config_path: Option<&str>) -> crate::domain::Result<PatternRegistry> {
        if let Some(ref path) = self.pattern_library {
            return Ok(PatternRegistry::from_file(path)?);
        }
        let config = load_settings(config_path)?;
        Ok(match config.scan.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path)?,
            None => PatternRegistry::default_patterns()?,
        })
    }

    /// Execute the list-rules command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let registry = match self.load_registry(config_path) {
            Ok(r) => r,
            Err(e) => return Ok(fail("Failed to load pattern library", &e)),
        };

        let rules: Vec<_> = registry
            .rules()
            .iter()
            .map(|rule| {
                json!({
                    "name": rule.name(),
                    "category": rule.category(),
                    "pattern": rule.pattern(),
                    "case_insensitive": rule.is_case_insensitive(),
                })
            })
            .collect();
        print_json(&rules, self.pretty)?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_custom_library() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "[[rules]]\nname = \"iban\"\ncategory = \"pii\"\npattern = '\\b[A-Z]{{2}}\\d{{2}}[A-Z0-9]{{11,30}}\\b'\n"
        )
        .unwrap();

        let args = ListRulesArgs {
            pattern_library: Some(file.path().to_path_buf()),
            pretty: false,
        };
        let registry = args.load_registry(None).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["iban"]);
    }
}
