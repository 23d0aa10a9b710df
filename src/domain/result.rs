//! Result type alias for shoploader

use super::errors::LoaderError;

/// Result type alias for shoploader operations
///
/// # Examples
///
/// ```
/// use shoploader::domain::result::Result;
/// use shoploader::domain::errors::LoaderError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LoaderError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LoaderError>;
