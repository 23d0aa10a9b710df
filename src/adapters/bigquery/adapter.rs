//! BigQuery destination

use super::client::BigQueryClient;
use super::models::{InsertAllRequest, InsertAllRow};
use crate::adapters::destination::traits::{Destination, InsertFailure, InsertResult};
use crate::domain::ids::{DatasetName, ResourceName};
use crate::domain::records::LoadRow;
use crate::domain::Result;
use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// BigQuery implementation of [`Destination`]
pub struct BigQueryAdapter {
    client: BigQueryClient,
    max_rows_per_request: usize,
}

impl BigQueryAdapter {
    /// Create a new BigQuery adapter
    pub fn new(client: BigQueryClient, max_rows_per_request: usize) -> Self {
        Self {
            client,
            max_rows_per_request: max_rows_per_request.max(1),
        }
    }

    async fn insert_chunk(
        &self,
        dataset: &DatasetName,
        table: &ResourceName,
        chunk: &[LoadRow],
    ) -> Result<InsertResult> {
        let request = InsertAllRequest {
            skip_invalid_rows: false,
            ignore_unknown_values: false,
            rows: chunk.iter().map(to_insert_row).collect::<Result<_>>()?,
        };

        let response = self.client.insert_all(dataset, table, &request).await?;

        let mut rejected: BTreeMap<usize, String> = BTreeMap::new();
        for row_errors in &response.insert_errors {
            rejected
                .entry(row_errors.index)
                .or_insert_with(|| row_errors.describe());
        }

        let failures: Vec<InsertFailure> = rejected
            .into_iter()
            .filter_map(|(index, error)| {
                chunk.get(index).map(|row| InsertFailure {
                    record_id: row.record_id,
                    error,
                })
            })
            .collect();

        Ok(InsertResult {
            success_count: chunk.len() - failures.len(),
            failure_count: failures.len(),
            failures,
        })
    }
}

/// Envelope columns as a streaming-insert row; `data` travels as a JSON string
fn to_insert_row(row: &LoadRow) -> Result<InsertAllRow> {
    let mut json = Map::new();
    json.insert("record_id".to_string(), Value::from(row.record_id.to_string()));
    json.insert("load_id".to_string(), Value::from(row.load_id.as_str()));
    json.insert("record_index".to_string(), Value::from(row.record_index));
    json.insert("record_hash".to_string(), Value::from(row.record_hash.as_str()));
    json.insert("data".to_string(), Value::from(serde_json::to_string(&row.data)?));
    json.insert(
        "loaded_at".to_string(),
        Value::from(row.loaded_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
    );

    Ok(InsertAllRow {
        insert_id: row.record_id.to_string(),
        json,
    })
}

#[async_trait]
impl Destination for BigQueryAdapter {
    fn name(&self) -> &str {
        "bigquery"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_dataset_exists(&self, dataset: &DatasetName) -> Result<()> {
        if self.client.dataset_exists(dataset).await? {
            tracing::debug!(dataset = %dataset, "BigQuery dataset exists");
            return Ok(());
        }
        self.client.create_dataset(dataset).await
    }

    async fn ensure_table_exists(&self, dataset: &DatasetName, table: &ResourceName) -> Result<()> {
        if self.client.table_exists(dataset, table).await? {
            tracing::debug!(dataset = %dataset, table = %table, "BigQuery table exists");
            return Ok(());
        }
        self.client.create_table(dataset, table).await
    }

    async fn insert_rows(
        &self,
        dataset: &DatasetName,
        table: &ResourceName,
        rows: Vec<LoadRow>,
    ) -> Result<InsertResult> {
        let mut result = InsertResult::default();

        for chunk in rows.chunks(self.max_rows_per_request) {
            let chunk_result = self.insert_chunk(dataset, table, chunk).await?;

            if chunk_result.failure_count > 0 {
                tracing::warn!(
                    project = %self.client.project_id(),
                    dataset = %dataset,
                    table = %table,
                    failed = chunk_result.failure_count,
                    "BigQuery rejected rows"
                );
            }

            result.success_count += chunk_result.success_count;
            result.failure_count += chunk_result.failure_count;
            result.failures.extend(chunk_result.failures);
        }

        Ok(result)
    }
}
