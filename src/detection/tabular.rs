//! Cell-level PII scanner for sampled table rows

use super::patterns::RuleSet;
use crate::domain::{RowSample, TableMatch};

/// Scans row samples cell by cell
///
/// Every matching (cell, rule) pair produces one [`TableMatch`]; nothing is
/// aggregated. The scanner only sees stringified values, so it does not care
/// which database dialect produced the sample.
#[derive(Debug, Clone)]
pub struct TabularScanner {
    rules: RuleSet,
}

impl TabularScanner {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Scan a sample, in row order then column order then rule order
    pub fn scan(&self, sample: &RowSample) -> Vec<TableMatch> {
        let mut records = Vec::new();

        for row in &sample.rows {
            for (index, cell) in row.iter().enumerate() {
                let value = match cell.as_deref() {
                    Some(v) if !v.is_empty() => v,
                    _ => continue,
                };

                for rule in self.rules.iter() {
                    if rule.is_match(value) {
                        records.push(TableMatch {
                            table: sample.table.clone(),
                            column: sample.column_name(index),
                            value: value.to_string(),
                            pii_type: rule.name().to_string(),
                        });
                    }
                }
            }
        }

        records
    }
}
