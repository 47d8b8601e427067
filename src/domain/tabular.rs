//! Tabular value types shared between the data-access collaborator and the
//! tabular scanner.

use serde::{Deserialize, Serialize};

/// A bounded sample of rows fetched from one table
///
/// Values are already stringified by the data source; `None` represents a
/// SQL NULL. Rows are positionally aligned with `columns`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSample {
    /// Table the rows were sampled from
    pub table: String,

    /// Column names in select order
    pub columns: Vec<String>,

    /// Row values
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSample {
    /// Creates an empty sample for a table with the given columns
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row
    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    /// Builder-style variant of [`push_row`](Self::push_row)
    pub fn with_row<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.rows
            .push(values.into_iter().map(|v| v.map(Into::into)).collect());
        self
    }

    /// Number of sampled rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column name for a cell position; falls back to a positional name for
    /// rows wider than the column list
    pub fn column_name(&self, index: usize) -> String {
        self.columns
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("column_{index}"))
    }
}

/// One matching cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMatch {
    /// Table name
    pub table: String,

    /// Column name
    pub column: String,

    /// Stringified cell value
    pub value: String,

    /// Rule that matched
    pub pii_type: String,
}

/// Column description reported by schema inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,

    /// Database type name as reported by the source
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column description
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}
