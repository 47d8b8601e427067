//! External system integrations for Sift.
//!
//! This module provides adapters for the databases Sift samples:
//!
//! - [`database`] - Table source abstraction (trait-based) and an in-memory source
//! - [`postgresql`] - PostgreSQL implementation
//!
//! # Design Pattern
//!
//! Adapters isolate driver types behind the [`database::TableSource`] trait.
//! The scan path only sees stringified row samples, so tests run against
//! [`database::InMemoryTableSource`].
//!
//! ```rust,no_run
//! use sift::adapters::database::create_table_source;
//! use sift::config::DatabaseConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::from_connection_string("postgresql://scanner@localhost/hr");
//! let source = create_table_source(&config).await?;
//! let tables = source.list_tables().await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
