//! Row building and batching
//!
//! Records are wrapped in [`LoadRow`] envelopes and grouped into batches of
//! the configured size before they are handed to a destination.

use crate::adapters::destination::InsertResult;
use crate::domain::ids::LoadId;
use crate::domain::records::{LoadRow, Record};
use crate::domain::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Calculate the SHA-256 hash of a record
///
/// Object keys are sorted first, so records that differ only in key order
/// hash the same.
///
/// # Examples
///
/// ```
/// use shoploader::core::load::batch::record_hash;
/// use serde_json::json;
///
/// let a = record_hash(&json!({"sku": "x", "qty": 1})).unwrap();
/// let b = record_hash(&json!({"qty": 1, "sku": "x"})).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn record_hash(record: &Value) -> Result<String> {
    let canonical = serde_json::to_string(&canonicalize(record))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let result = hasher.finalize();

    Ok(format!("{result:x}"))
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        _ => value.clone(),
    }
}

/// Builds envelope rows for one pipeline run
#[derive(Debug, Clone)]
pub struct RowBuilder {
    load_id: LoadId,
    loaded_at: DateTime<Utc>,
}

impl RowBuilder {
    /// Create a builder stamping rows with the run's load id and start time
    pub fn new(load_id: LoadId, loaded_at: DateTime<Utc>) -> Self {
        Self { load_id, loaded_at }
    }

    /// Wrap the record at `record_index` of its resource stream
    pub fn build(&self, record_index: u64, record: Record) -> Result<LoadRow> {
        Ok(LoadRow {
            record_id: Uuid::new_v4(),
            load_id: self.load_id.clone(),
            record_index,
            record_hash: record_hash(&record)?,
            data: record,
            loaded_at: self.loaded_at,
        })
    }
}

/// Accumulates rows until a batch is full
#[derive(Debug)]
pub struct RowBatcher {
    batch_size: usize,
    rows: Vec<LoadRow>,
}

impl RowBatcher {
    /// Create a batcher; a size of 0 is treated as 1
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            batch_size,
            rows: Vec::with_capacity(batch_size),
        }
    }

    /// Add a row, returning a full batch when one is ready
    pub fn push(&mut self, row: LoadRow) -> Option<Vec<LoadRow>> {
        self.rows.push(row);
        if self.rows.len() >= self.batch_size {
            Some(std::mem::replace(
                &mut self.rows,
                Vec::with_capacity(self.batch_size),
            ))
        } else {
            None
        }
    }

    /// Take the remaining partial batch, if any
    pub fn finish(&mut self) -> Option<Vec<LoadRow>> {
        if self.rows.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.rows))
        }
    }
}

/// Result of writing one or more batches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// Rows the destination accepted
    pub loaded: usize,
    /// Rows the destination rejected
    pub failed: usize,
    /// Error messages for rejected rows
    pub errors: Vec<String>,
}

impl BatchResult {
    /// Create a new empty batch result
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows counted as loaded without a destination write (dry run)
    pub fn simulated(count: usize) -> Self {
        Self {
            loaded: count,
            ..Self::default()
        }
    }

    /// Merge another batch result into this one
    pub fn merge(&mut self, other: BatchResult) {
        self.loaded += other.loaded;
        self.failed += other.failed;
        self.errors.extend(other.errors);
    }
}

impl From<InsertResult> for BatchResult {
    fn from(result: InsertResult) -> Self {
        Self {
            loaded: result.success_count,
            failed: result.failure_count,
            errors: result
                .failures
                .into_iter()
                .map(|f| format!("record {}: {}", f.record_id, f.error))
                .collect(),
        }
    }
}
