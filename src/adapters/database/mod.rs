//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over the databases Sift
//! samples, so the scan path works with PostgreSQL or an in-memory source.

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_table_source;
pub use memory::InMemoryTableSource;
pub use traits::TableSource;
