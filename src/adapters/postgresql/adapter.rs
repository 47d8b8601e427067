//! PostgreSQL adapter implementing the table source trait
//!
//! Tables are discovered through `information_schema` and sampled with every
//! column cast to `text`, so the scanner never sees driver types.

use crate::adapters::database::traits::TableSource;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::domain::{ColumnInfo, DataAccessError, RowSample};
use async_trait::async_trait;

const LIST_TABLES_SQL: &str = "SELECT table_name::text FROM information_schema.tables \
     WHERE table_schema = $1 AND table_type = 'BASE TABLE' ORDER BY table_name";

const DESCRIBE_TABLE_SQL: &str = "SELECT column_name::text, data_type::text \
     FROM information_schema.columns \
     WHERE table_schema = $1 AND table_name = $2 ORDER BY ordinal_position";

/// PostgreSQL implementation of [`TableSource`]
pub struct PostgreSQLAdapter {
    client: PostgreSQLClient,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self { client }
    }
}

/// Quote an identifier, doubling embedded quotes
fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Build the sampling query; every column is cast to text
fn sample_query(schema: &str, table: &str, columns: &[ColumnInfo], limit: usize) -> String {
    let select_list = columns
        .iter()
        .map(|c| format!("{}::text", quote_identifier(&c.name)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT {} FROM {}.{} LIMIT {}",
        select_list,
        quote_identifier(schema),
        quote_identifier(table),
        limit
    )
}

#[async_trait]
impl TableSource for PostgreSQLAdapter {
    fn database_name(&self) -> &str {
        self.client.database_name()
    }

    fn row_limit(&self) -> usize {
        self.client.row_limit()
    }

    async fn test_connection(&self) -> Result<(), DataAccessError> {
        self.client.test_connection().await
    }

    async fn list_tables(&self) -> Result<Vec<String>, DataAccessError> {
        let rows = self
            .client
            .query(LIST_TABLES_SQL, &[&self.client.schema()])
            .await?;

        rows.iter()
            .map(|row| {
                row.try_get::<_, String>(0)
                    .map_err(|e| DataAccessError::QueryFailed(e.to_string()))
            })
            .collect()
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DataAccessError> {
        let rows = self
            .client
            .query(DESCRIBE_TABLE_SQL, &[&self.client.schema(), &table])
            .await?;

        if rows.is_empty() {
            return Err(DataAccessError::TableNotFound(table.to_string()));
        }

        rows.iter()
            .map(|row| {
                let name: String = row
                    .try_get(0)
                    .map_err(|e| DataAccessError::QueryFailed(e.to_string()))?;
                let data_type: String = row
                    .try_get(1)
                    .map_err(|e| DataAccessError::QueryFailed(e.to_string()))?;
                Ok(ColumnInfo::new(name, data_type))
            })
            .collect()
    }

    async fn fetch_sample(&self, table: &str) -> Result<RowSample, DataAccessError> {
        let columns = self.describe_table(table).await?;
        let query = sample_query(self.client.schema(), table, &columns, self.row_limit());

        tracing::debug!(table = %table, columns = columns.len(), "Sampling table");
        let rows = self.client.query(&query, &[]).await?;

        let mut sample = RowSample::new(
            table,
            columns.iter().map(|c| c.name.clone()).collect(),
        );
        for row in &rows {
            let values = (0..columns.len())
                .map(|i| {
                    row.try_get::<_, Option<String>>(i)
                        .map_err(|e| DataAccessError::QueryFailed(e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            sample.push_row(values);
        }

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "\"users\"");
        assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_sample_query() {
        let columns = vec![
            ColumnInfo::new("id", "integer"),
            ColumnInfo::new("Email", "text"),
        ];
        assert_eq!(
            sample_query("public", "users", &columns, 1000),
            "SELECT \"id\"::text, \"Email\"::text FROM \"public\".\"users\" LIMIT 1000"
        );
    }
}
