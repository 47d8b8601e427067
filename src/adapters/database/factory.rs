//! Table source factory
//!
//! This module provides the factory function that creates a table source from
//! configuration.

use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::database::traits::TableSource;
use crate::config::{redact_connection_string, DatabaseConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create a table source based on the configuration
///
/// # Arguments
///
/// * `config` - The `[database]` configuration section
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements TableSource
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the pool cannot
/// be built. No connection is opened until the first query.
pub async fn create_table_source(config: &DatabaseConfig) -> Result<Arc<dyn TableSource>> {
    tracing::info!(
        connection = %redact_connection_string(&config.connection_string),
        schema = %config.schema,
        row_limit = config.row_limit,
        "Creating PostgreSQL table source"
    );

    let client = PostgreSQLClient::new(config.clone()).await?;
    let adapter = PostgreSQLAdapter::new(client);

    Ok(Arc::new(adapter) as Arc<dyn TableSource>)
}
