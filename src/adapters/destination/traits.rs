//! Destination abstraction traits
//!
//! This module defines the trait that warehouse backends implement to
//! receive pipeline output.

use crate::domain::ids::{DatasetName, ResourceName};
use crate::domain::records::LoadRow;
use crate::domain::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Envelope columns, in table order
pub const ENVELOPE_COLUMNS: [&str; 6] = [
    "record_id",
    "load_id",
    "record_index",
    "record_hash",
    "data",
    "loaded_at",
];

/// Result of inserting one batch of rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertResult {
    /// Number of rows written
    pub success_count: usize,

    /// Number of rows rejected
    pub failure_count: usize,

    /// Details of rejected rows
    pub failures: Vec<InsertFailure>,
}

impl InsertResult {
    /// Every row of a batch of `count` was written
    pub fn all_succeeded(count: usize) -> Self {
        Self {
            success_count: count,
            failure_count: 0,
            failures: Vec::new(),
        }
    }

    /// Every row of the batch failed for the same reason
    pub fn all_failed(rows: &[LoadRow], error: &str) -> Self {
        let failures: Vec<InsertFailure> = rows
            .iter()
            .map(|row| InsertFailure {
                record_id: row.record_id,
                error: error.to_string(),
            })
            .collect();

        Self {
            success_count: 0,
            failure_count: failures.len(),
            failures,
        }
    }
}

/// A row the destination rejected
#[derive(Debug, Clone, PartialEq)]
pub struct InsertFailure {
    /// Envelope id of the rejected row
    pub record_id: Uuid,

    /// Error message reported by the destination
    pub error: String,
}

/// Warehouse destination
///
/// A dataset groups tables (a BigQuery dataset, a PostgreSQL schema or a
/// directory); each resource is loaded into the table named after it. Every
/// table has the envelope layout in [`ENVELOPE_COLUMNS`].
#[async_trait]
pub trait Destination: Send + Sync {
    /// Destination name for logs and the load summary
    fn name(&self) -> &str;

    /// Test connectivity and credentials
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be reached or rejects the
    /// credentials.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the dataset exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be created or accessed.
    async fn ensure_dataset_exists(&self, dataset: &DatasetName) -> Result<()>;

    /// Ensure the envelope table for a resource exists
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be created.
    async fn ensure_table_exists(&self, dataset: &DatasetName, table: &ResourceName) -> Result<()>;

    /// Insert a batch of rows
    ///
    /// Rows the destination rejects individually are reported in the
    /// returned [`InsertResult`] rather than as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the destination could not process the
    /// request at all.
    async fn insert_rows(
        &self,
        dataset: &DatasetName,
        table: &ResourceName,
        rows: Vec<LoadRow>,
    ) -> Result<InsertResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::LoadId;
    use chrono::Utc;
    use serde_json::json;

    fn row(index: u64) -> LoadRow {
        let now = Utc::now();
        LoadRow {
            record_id: Uuid::new_v4(),
            load_id: LoadId::from_timestamp(now),
            record_index: index,
            record_hash: "0".repeat(64),
            data: json!({"id": index}),
            loaded_at: now,
        }
    }

    #[test]
    fn test_all_succeeded() {
        let result = InsertResult::all_succeeded(3);
        assert_eq!(result.success_count, 3);
        assert_eq!(result.failure_count, 0);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_all_failed() {
        let rows = vec![row(0), row(1)];
        let result = InsertResult::all_failed(&rows, "connection reset");

        assert_eq!(result.success_count, 0);
        assert_eq!(result.failure_count, 2);
        assert_eq!(result.failures[1].record_id, rows[1].record_id);
        assert_eq!(result.failures[0].error, "connection reset");
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(InsertResult::default(), InsertResult::all_succeeded(0));
    }
}
