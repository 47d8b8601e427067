//! PostgreSQL database integration
//!
//! This module provides the PostgreSQL implementation of the table source
//! used by table scans.

pub mod adapter;
pub mod client;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
