//! Line-oriented PII scanner for normalized document text

use super::patterns::RuleSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Findings for one text blob
///
/// `matches` holds every matched substring per type, in line order then rule
/// order. `locations` holds one `"Line N"` entry per line that produced at
/// least one match of that type, so the two lists are not positionally
/// aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFindings {
    /// Matched values by PII type
    pub matches: BTreeMap<String, Vec<String>>,

    /// Line references by PII type
    pub locations: BTreeMap<String, Vec<String>>,
}

/// Aggregated findings for a single PII type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMatchRecord {
    pub pii_type: String,
    pub values: Vec<String>,
    pub locations: Vec<String>,
}

impl TextFindings {
    /// Whether any rule matched
    pub fn has_pii(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Number of matched values per type
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.matches
            .iter()
            .map(|(pii_type, values)| (pii_type.clone(), values.len()))
            .collect()
    }

    /// Total number of matched values across all types
    pub fn total_matches(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// Per-type records in type-name order
    pub fn records(&self) -> Vec<TextMatchRecord> {
        self.matches
            .iter()
            .map(|(pii_type, values)| TextMatchRecord {
                pii_type: pii_type.clone(),
                values: values.clone(),
                locations: self.locations.get(pii_type).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

/// Scans text line by line with a fixed rule set
#[derive(Debug, Clone)]
pub struct TextScanner {
    rules: RuleSet,
}

impl TextScanner {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Rules this scanner evaluates
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Scan a text blob
    ///
    /// Lines are numbered from 1. Each rule contributes every non-overlapping
    /// match on a line, and a single location entry for that line.
    pub fn scan(&self, text: &str) -> TextFindings {
        let mut findings = TextFindings::default();

        for (index, line) in text.lines().enumerate() {
            let line_ref = format!("Line {}", index + 1);

            for rule in self.rules.iter() {
                let mut found = rule.find_all(line).peekable();
                if found.peek().is_none() {
                    continue;
                }

                findings
                    .matches
                    .entry(rule.name().to_string())
                    .or_default()
                    .extend(found.map(str::to_string));
                findings
                    .locations
                    .entry(rule.name().to_string())
                    .or_default()
                    .push(line_ref.clone());
            }
        }

        findings
    }
}
