//! Table metadata: per-table summaries and column-name classification

use super::report::{TableOutcome, TableScanReport};
use crate::detection::{PatternRegistry, RuleCategory, RuleSet};
use serde::{Deserialize, Serialize};

/// Match counts per coarse category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub pii: usize,
    pub identifiers: usize,
    pub behavioral: usize,
}

impl CategoryCounts {
    fn increment(&mut self, category: RuleCategory) {
        match category {
            RuleCategory::Pii => self.pii += 1,
            RuleCategory::Identifiers => self.identifiers += 1,
            RuleCategory::Behavioral => self.behavioral += 1,
        }
    }

    /// Sum over all categories
    pub fn total(&self) -> usize {
        self.pii + self.identifiers + self.behavioral
    }
}

/// Per-column statistics within one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,

    /// Number of match records in this column
    pub matched: usize,

    /// Distinct rule names that matched, in first-seen order
    pub pii_types: Vec<String>,
}

/// Summary of one table's scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
    pub classifications: CategoryCounts,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a whole table batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSummary {
    pub database: String,
    pub tables: Vec<TableSummary>,
}

/// Reduce a table report to per-table, per-column statistics
///
/// Every sampled column is listed, including those without matches. Each
/// match record counts once toward its rule's category.
pub fn summarize_tables(report: &TableScanReport, registry: &PatternRegistry) -> DatabaseSummary {
    let tables = report
        .tables
        .iter()
        .map(|outcome| match outcome {
            TableOutcome::Scanned {
                table,
                row_count,
                columns,
                records,
            } => {
                let mut column_summaries: Vec<ColumnSummary> = columns
                    .iter()
                    .map(|name| ColumnSummary {
                        name: name.clone(),
                        matched: 0,
                        pii_types: Vec::new(),
                    })
                    .collect();
                let mut classifications = CategoryCounts::default();

                for record in records {
                    let category = registry.category(&record.pii_type).unwrap_or_default();
                    classifications.increment(category);

                    let index = match column_summaries.iter().position(|c| c.name == record.column) {
                        Some(index) => index,
                        None => {
                            column_summaries.push(ColumnSummary {
                                name: record.column.clone(),
                                matched: 0,
                                pii_types: Vec::new(),
                            });
                            column_summaries.len() - 1
                        }
                    };
                    let column = &mut column_summaries[index];
                    column.matched += 1;
                    if !column.pii_types.contains(&record.pii_type) {
                        column.pii_types.push(record.pii_type.clone());
                    }
                }

                TableSummary {
                    name: table.clone(),
                    row_count: *row_count,
                    columns: column_summaries,
                    classifications,
                    error: None,
                }
            }
            TableOutcome::Failed { table, error } => TableSummary {
                name: table.clone(),
                row_count: 0,
                columns: Vec::new(),
                classifications: CategoryCounts::default(),
                error: Some(error.clone()),
            },
        })
        .collect();

    DatabaseSummary {
        database: report.database.clone(),
        tables,
    }
}

/// Classification of one column inferred from its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub name: String,
    pub data_type: String,
    pub pii_type: Option<String>,
}

/// Column classifications for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableClassification {
    Classified {
        table: String,
        columns: Vec<ColumnClassification>,
    },
    Failed {
        table: String,
        error: String,
    },
}

/// First rule, in registration order, whose name occurs in the lowercased
/// column name
pub fn classify_column_name(column: &str, rules: &RuleSet) -> Option<String> {
    let lowered = column.to_lowercase();
    rules
        .iter()
        .find(|rule| lowered.contains(rule.name()))
        .map(|rule| rule.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::RuleSelection;
    use crate::domain::TableMatch;
    use chrono::Utc;
    use test_case::test_case;
    use uuid::Uuid;

    fn record(column: &str, value: &str, pii_type: &str) -> TableMatch {
        TableMatch {
            table: "customers".to_string(),
            column: column.to_string(),
            value: value.to_string(),
            pii_type: pii_type.to_string(),
        }
    }

    #[test]
    fn test_summarize_tables_counts_categories() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let report = TableScanReport {
            batch_id: Uuid::new_v4(),
            database: "crm".to_string(),
            started_at: Utc::now(),
            duration_ms: 12,
            tables: vec![
                TableOutcome::Scanned {
                    table: "customers".to_string(),
                    row_count: 2,
                    columns: vec!["id".to_string(), "email".to_string(), "last_ip".to_string()],
                    records: vec![
                        record("email", "a@example.com", "email"),
                        record("email", "b@example.com", "email"),
                        record("last_ip", "10.0.0.1", "ip_address"),
                    ],
                },
                TableOutcome::Failed {
                    table: "ledger".to_string(),
                    error: "Query failed: permission denied".to_string(),
                },
            ],
        };

        let summary = summarize_tables(&report, &registry);
        assert_eq!(summary.database, "crm");
        assert_eq!(summary.tables.len(), 2);

        let customers = &summary.tables[0];
        assert_eq!(customers.row_count, 2);
        assert_eq!(
            customers.classifications,
            CategoryCounts {
                pii: 2,
                identifiers: 0,
                behavioral: 1
            }
        );
        assert_eq!(customers.columns[0].matched, 0);
        assert_eq!(customers.columns[1].matched, 2);
        assert_eq!(customers.columns[1].pii_types, vec!["email"]);
        assert_eq!(customers.columns[2].pii_types, vec!["ip_address"]);

        let ledger = &summary.tables[1];
        assert!(ledger.error.is_some());
        assert_eq!(ledger.classifications.total(), 0);
    }

    #[test_case("customer_email", Some("email") ; "email column")]
    #[test_case("Phone_Number", Some("phone") ; "mixed case")]
    #[test_case("full_name", Some("name") ; "name column")]
    #[test_case("created_at", None ; "no rule name")]
    #[test_case("id", None ; "short column")]
    fn test_classify_column_name(column: &str, expected: Option<&str>) {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rules = registry.select(&RuleSelection::all()).unwrap();
        assert_eq!(
            classify_column_name(column, &rules).as_deref(),
            expected
        );
    }

    #[test]
    fn test_classify_respects_selection() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rules = registry
            .select(&RuleSelection::from_names(["phone"]))
            .unwrap();
        assert_eq!(classify_column_name("customer_email", &rules), None);
    }
}
