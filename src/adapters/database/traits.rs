//! Table source trait
//!
//! This module defines the trait the tabular scan path uses to discover
//! tables and fetch bounded row samples. Implementations stringify every
//! value and own the row limit.

use crate::domain::{ColumnInfo, DataAccessError, RowSample};
use async_trait::async_trait;

/// Read-only access to a relational database's tables
///
/// Implementations must be shareable across the orchestrator's concurrent
/// tasks.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Name of the database being sampled
    fn database_name(&self) -> &str;

    /// Maximum number of rows returned by [`fetch_sample`](Self::fetch_sample)
    fn row_limit(&self) -> usize;

    /// Test the connection
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable.
    async fn test_connection(&self) -> Result<(), DataAccessError>;

    /// List the base tables visible to the scanner, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog query fails.
    async fn list_tables(&self) -> Result<Vec<String>, DataAccessError>;

    /// Describe a table's columns in ordinal order
    ///
    /// # Errors
    ///
    /// Returns [`DataAccessError::TableNotFound`] for an unknown table.
    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DataAccessError>;

    /// Fetch up to [`row_limit`](Self::row_limit) rows, every value rendered
    /// as text and SQL NULL as `None`
    ///
    /// # Errors
    ///
    /// Returns [`DataAccessError::TableNotFound`] for an unknown table, or
    /// [`DataAccessError::QueryFailed`] if sampling fails.
    async fn fetch_sample(&self, table: &str) -> Result<RowSample, DataAccessError>;
}
