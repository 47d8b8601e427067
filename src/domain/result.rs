//! Result type alias for Sift

use super::errors::SiftError;

/// Result type alias for Sift operations
///
/// # Examples
///
/// ```
/// use sift::domain::result::Result;
/// use sift::domain::errors::SiftError;
///
/// fn failing_function() -> Result<()> {
///     Err(SiftError::Validation("no items submitted".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SiftError>;
