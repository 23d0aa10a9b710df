//! Domain models and types for shoploader.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Validated identifiers** ([`ResourceName`], [`DatasetName`], [`LoadId`])
//! - **Record types** ([`FlattenedPair`], [`LoadRow`])
//! - **Error types** ([`LoaderError`], [`SourceError`], [`RecordShapeError`], [`BigQueryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Names that end up as destination identifiers are newtypes so an
//! unvalidated string can never reach a `CREATE TABLE` statement:
//!
//! ```rust
//! use shoploader::domain::{DatasetName, ResourceName};
//!
//! # fn example() -> Result<(), String> {
//! let dataset = DatasetName::new("shopify_sales")?;
//! let table = ResourceName::new("raw_orders")?;
//! assert!(ResourceName::new("raw_orders; DROP TABLE x").is_err());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod records;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BigQueryError, LoaderError, RecordShapeError, SourceError};
pub use ids::{DatasetName, LoadId, ResourceName};
pub use records::{FlattenedPair, LoadRow, Record};
pub use result::Result;
