//! In-memory table source
//!
//! Holds fixed row samples. Used for tests and for scanning exported data
//! without a live database.

use super::traits::TableSource;
use crate::domain::{ColumnInfo, DataAccessError, RowSample};
use async_trait::async_trait;
use std::collections::BTreeMap;

const DEFAULT_ROW_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
enum MemoryTable {
    Rows {
        columns: Vec<ColumnInfo>,
        sample: RowSample,
    },
    Failing(String),
}

/// [`TableSource`] backed by in-memory samples
#[derive(Debug, Clone)]
pub struct InMemoryTableSource {
    database: String,
    row_limit: usize,
    tables: BTreeMap<String, MemoryTable>,
    unreachable: Option<String>,
}

impl InMemoryTableSource {
    /// Create an empty source
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            row_limit: DEFAULT_ROW_LIMIT,
            tables: BTreeMap::new(),
            unreachable: None,
        }
    }

    /// Set the maximum number of rows returned per sample
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Add a table; every column is reported with type `text`
    pub fn with_table(mut self, sample: RowSample) -> Self {
        let columns = sample
            .columns
            .iter()
            .map(|name| ColumnInfo::new(name.clone(), "text"))
            .collect();
        self.tables
            .insert(sample.table.clone(), MemoryTable::Rows { columns, sample });
        self
    }

    /// Add a table with explicit column types
    pub fn with_typed_table(mut self, columns: Vec<ColumnInfo>, sample: RowSample) -> Self {
        self.tables
            .insert(sample.table.clone(), MemoryTable::Rows { columns, sample });
        self
    }

    /// Add a table whose every access fails with a query error
    pub fn with_failing_table(mut self, table: impl Into<String>, message: impl Into<String>) -> Self {
        self.tables
            .insert(table.into(), MemoryTable::Failing(message.into()));
        self
    }

    /// Make every access fail as if the database could not be reached
    pub fn with_unreachable(mut self, message: impl Into<String>) -> Self {
        self.unreachable = Some(message.into());
        self
    }

    fn ensure_reachable(&self) -> Result<(), DataAccessError> {
        match self.unreachable {
            Some(ref message) => Err(DataAccessError::ConnectionFailed(message.clone())),
            None => Ok(()),
        }
    }

    fn table(&self, table: &str) -> Result<(&[ColumnInfo], &RowSample), DataAccessError> {
        self.ensure_reachable()?;
        match self.tables.get(table) {
            Some(MemoryTable::Rows { columns, sample }) => Ok((columns, sample)),
            Some(MemoryTable::Failing(message)) => {
                Err(DataAccessError::QueryFailed(message.clone()))
            }
            None => Err(DataAccessError::TableNotFound(table.to_string())),
        }
    }
}

#[async_trait]
impl TableSource for InMemoryTableSource {
    fn database_name(&self) -> &str {
        &self.database
    }

    fn row_limit(&self) -> usize {
        self.row_limit
    }

    async fn test_connection(&self) -> Result<(), DataAccessError> {
        self.ensure_reachable()
    }

    async fn list_tables(&self) -> Result<Vec<String>, DataAccessError> {
        self.ensure_reachable()?;
        Ok(self.tables.keys().cloned().collect())
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DataAccessError> {
        self.table(table).map(|(columns, _)| columns.to_vec())
    }

    async fn fetch_sample(&self, table: &str) -> Result<RowSample, DataAccessError> {
        let (_, sample) = self.table(table)?;
        let mut limited = RowSample::new(sample.table.clone(), sample.columns.clone());
        for row in sample.rows.iter().take(self.row_limit) {
            limited.push_row(row.clone());
        }
        Ok(limited)
    }
}
