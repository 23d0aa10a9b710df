//! Load orchestration and batch processing
//!
//! This module provides the core load logic for shoploader, including:
//! - Envelope building and batching
//! - Pipeline orchestration
//! - Summary and reporting

pub mod batch;
pub mod pipeline;
pub mod summary;

pub use batch::{record_hash, BatchResult, RowBatcher, RowBuilder};
pub use pipeline::{Pipeline, PipelineSettings};
pub use summary::{LoadInfo, ResourceLoad, ResourceStatus};
