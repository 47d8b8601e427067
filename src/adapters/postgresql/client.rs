//! PostgreSQL client implementation
//!
//! This module provides the pooled client used to inspect and sample tables.

use crate::config::{redact_connection_string, DatabaseConfig};
use crate::domain::{DataAccessError, Result, SiftError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for Sift
///
/// Wraps a connection pool. Every query runs with the configured statement
/// timeout.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Database name from the connection string
    database: String,

    /// Configuration
    config: DatabaseConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// # Arguments
    ///
    /// * `config` - Database configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string or TLS setup is invalid.
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                SiftError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
            })?;

        let database = pg_config.get_dbname().unwrap_or("postgres").to_string();

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match config.ssl_mode.as_str() {
            "require" | "verify-ca" | "verify-full" => {
                let connector = TlsConnector::builder()
                    .danger_accept_invalid_certs(config.ssl_mode == "require")
                    .danger_accept_invalid_hostnames(config.ssl_mode != "verify-full")
                    .build()
                    .map_err(|e| {
                        SiftError::Configuration(format!("Failed to build TLS connector: {}", e))
                    })?;
                Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
            }
            _ => Manager::from_config(pg_config, NoTls, manager_config),
        };

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                SiftError::Configuration(format!("Failed to create connection pool: {}", e))
            })?;

        tracing::debug!(
            connection = %redact_connection_string(&config.connection_string),
            max_connections = config.max_connections,
            ssl_mode = %config.ssl_mode,
            "PostgreSQL pool created"
        );

        Ok(Self {
            pool,
            database,
            config,
        })
    }

    /// Test the connection to PostgreSQL
    ///
    /// Attempts to get a connection from the pool and execute a simple query.
    pub async fn test_connection(&self) -> std::result::Result<(), DataAccessError> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| DataAccessError::ConnectionFailed(format!("Connection test failed: {}", e)))?;

        tracing::info!(database = %self.database, "PostgreSQL connection test successful");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(
        &self,
    ) -> std::result::Result<deadpool_postgres::Object, DataAccessError> {
        self.pool.get().await.map_err(|e| {
            DataAccessError::ConnectionFailed(format!("Failed to get connection from pool: {}", e))
        })
    }

    /// Execute a query and return rows
    ///
    /// # Arguments
    ///
    /// * `query` - SQL query
    /// * `params` - Query parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> std::result::Result<Vec<Row>, DataAccessError> {
        let client = self.get_connection().await?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.batch_execute(&timeout_query).await.map_err(|e| {
            DataAccessError::QueryFailed(format!("Failed to set statement timeout: {}", e))
        })?;

        client
            .query(query, params)
            .await
            .map_err(|e| DataAccessError::QueryFailed(e.to_string()))
    }

    /// Database name
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Schema whose tables are scanned
    pub fn schema(&self) -> &str {
        &self.config.schema
    }

    /// Maximum rows per sample
    pub fn row_limit(&self) -> usize {
        self.config.row_limit
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}
