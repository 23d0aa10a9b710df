//! PostgreSQL destination
//!
//! A dataset maps to a schema and each resource to a table in it.

use crate::adapters::destination::traits::{Destination, InsertResult};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::domain::ids::{DatasetName, ResourceName};
use crate::domain::records::LoadRow;
use crate::domain::{LoaderError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of [`Destination`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    async fn insert_in_transaction(
        &self,
        dataset: &DatasetName,
        table: &ResourceName,
        rows: &[LoadRow],
    ) -> Result<()> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| LoaderError::Database(format!("Failed to begin transaction: {e}")))?;

        let stmt = tx
            .prepare_cached(&insert_sql(dataset, table))
            .await
            .map_err(|e| LoaderError::Database(format!("Failed to prepare insert: {e}")))?;

        for row in rows {
            let record_index = i64::try_from(row.record_index).unwrap_or(i64::MAX);
            tx.execute(
                &stmt,
                &[
                    &row.record_id,
                    &row.load_id.as_str(),
                    &record_index,
                    &row.record_hash,
                    &row.data,
                    &row.loaded_at,
                ],
            )
            .await
            .map_err(|e| {
                LoaderError::Database(format!(
                    "Insert of record {} failed: {e}",
                    row.record_id
                ))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| LoaderError::Database(format!("Failed to commit transaction: {e}")))
    }
}

#[async_trait]
impl Destination for PostgreSQLAdapter {
    fn name(&self) -> &str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_dataset_exists(&self, dataset: &DatasetName) -> Result<()> {
        self.client
            .batch_execute(&format!("CREATE SCHEMA IF NOT EXISTS \"{dataset}\""))
            .await?;

        tracing::debug!(schema = %dataset, "PostgreSQL schema ready");
        Ok(())
    }

    async fn ensure_table_exists(&self, dataset: &DatasetName, table: &ResourceName) -> Result<()> {
        self.client.batch_execute(&create_table_sql(dataset, table)).await?;

        tracing::debug!(schema = %dataset, table = %table, "PostgreSQL table ready");
        Ok(())
    }

    async fn insert_rows(
        &self,
        dataset: &DatasetName,
        table: &ResourceName,
        rows: Vec<LoadRow>,
    ) -> Result<InsertResult> {
        if rows.is_empty() {
            return Ok(InsertResult::default());
        }

        match self.insert_in_transaction(dataset, table, &rows).await {
            Ok(()) => Ok(InsertResult::all_succeeded(rows.len())),
            Err(e) => {
                tracing::error!(
                    schema = %dataset,
                    table = %table,
                    rows = rows.len(),
                    error = %e,
                    "PostgreSQL batch insert rolled back"
                );
                Ok(InsertResult::all_failed(&rows, &e.to_string()))
            }
        }
    }
}

fn create_table_sql(dataset: &DatasetName, table: &ResourceName) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{dataset}"."{table}" (
            record_id UUID PRIMARY KEY,
            load_id TEXT NOT NULL,
            record_index BIGINT NOT NULL,
            record_hash TEXT NOT NULL,
            data JSONB NOT NULL,
            loaded_at TIMESTAMPTZ NOT NULL
        );
        CREATE INDEX IF NOT EXISTS "{table}_load_id_idx" ON "{dataset}"."{table}" (load_id);
        "#
    )
}

fn insert_sql(dataset: &DatasetName, table: &ResourceName) -> String {
    format!(
        r#"
        INSERT INTO "{dataset}"."{table}" (
            record_id, load_id, record_index, record_hash, data, loaded_at
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (record_id) DO NOTHING
        "#
    )
}
