//! Domain types for Sift.
//!
//! The domain layer provides:
//! - **Error types** ([`SiftError`], [`ExtractionError`], [`RegistryError`], [`DataAccessError`])
//! - **Result type alias** ([`Result`])
//! - **Tabular value types** ([`RowSample`], [`TableMatch`], [`ColumnInfo`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, SiftError>`]. Component
//! errors convert with the `?` operator:
//!
//! ```rust
//! use sift::domain::{ExtractionError, Result};
//!
//! fn extract() -> Result<String> {
//!     Err(ExtractionError::EmptyInput("xlsx".to_string()).into())
//! }
//! ```

pub mod errors;
pub mod result;
pub mod tabular;

pub use errors::{DataAccessError, ExtractionError, RegistryError, SiftError};
pub use result::Result;
pub use tabular::{ColumnInfo, RowSample, TableMatch};
