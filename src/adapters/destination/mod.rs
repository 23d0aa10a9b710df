//! Destination abstraction layer
//!
//! This module provides the trait-based abstraction over warehouse backends,
//! allowing the pipeline to load into BigQuery, PostgreSQL or local files.

pub mod factory;
pub mod traits;

pub use factory::create_destination;
pub use traits::{Destination, InsertFailure, InsertResult, ENVELOPE_COLUMNS};
