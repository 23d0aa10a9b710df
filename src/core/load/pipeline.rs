//! Pipeline - main orchestrator for a load run
//!
//! Resources are processed one after another in configured order. Within a
//! resource, records are pulled lazily, wrapped in envelopes and written in
//! batches; each batch write is awaited before the next is built.

use crate::adapters::destination::Destination;
use crate::config::schema::{ShoploaderConfig, SourceErrorPolicy};
use crate::core::load::batch::{BatchResult, RowBatcher, RowBuilder};
use crate::core::load::summary::{LoadInfo, ResourceLoad, ResourceStatus};
use crate::core::source::{Resource, Source};
use crate::domain::ids::{DatasetName, LoadId, ResourceName};
use crate::domain::records::LoadRow;
use crate::domain::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Settings for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Name reported in logs and the summary
    pub pipeline_name: String,

    /// Destination dataset
    pub dataset: DatasetName,

    /// Rows per destination write
    pub batch_size: usize,

    /// What to do when a source file cannot be read
    pub on_source_error: SourceErrorPolicy,

    /// Read and transform, but skip every destination call
    pub dry_run: bool,
}

impl PipelineSettings {
    /// Settings from a loaded configuration
    pub fn from_config(config: &ShoploaderConfig) -> Self {
        Self {
            pipeline_name: config.pipeline.pipeline_name.clone(),
            dataset: config.pipeline.dataset_name.clone(),
            batch_size: config.pipeline.batch_size,
            on_source_error: config.pipeline.on_source_error,
            dry_run: config.application.dry_run,
        }
    }
}

/// Loads a [`Source`] into a [`Destination`]
pub struct Pipeline {
    settings: PipelineSettings,
    destination: Arc<dyn Destination>,
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new(settings: PipelineSettings, destination: Arc<dyn Destination>) -> Self {
        Self {
            settings,
            destination,
        }
    }

    /// Pipeline settings
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the pipeline over every resource of `source`
    ///
    /// # Errors
    ///
    /// - destination connection or dataset setup failures
    /// - a source error under [`SourceErrorPolicy::Fail`]
    /// - a structural error in the record stream (rows already written stay)
    /// - a destination write that fails as a whole
    pub async fn run(&self, source: &Source) -> Result<LoadInfo> {
        let start_time = Instant::now();
        let started_at = Utc::now();
        let load_id = LoadId::from_timestamp(started_at);

        tracing::info!(
            pipeline = %self.settings.pipeline_name,
            source = %source.name(),
            dataset = %self.settings.dataset,
            destination = %self.destination.name(),
            load_id = %load_id,
            resources = source.len(),
            dry_run = self.settings.dry_run,
            "Starting pipeline run"
        );

        let mut info = LoadInfo::new(
            self.settings.pipeline_name.clone(),
            self.settings.dataset.clone(),
            self.destination.name(),
            load_id.clone(),
            started_at,
            self.settings.dry_run,
        );

        if self.settings.dry_run {
            tracing::info!(
                destination = %self.destination.name(),
                dataset = %self.settings.dataset,
                "DRY RUN: Would connect to destination and create dataset"
            );
        } else {
            self.destination.test_connection().await?;
            self.destination
                .ensure_dataset_exists(&self.settings.dataset)
                .await?;
        }

        let rows = RowBuilder::new(load_id, started_at);
        for resource in source.resources() {
            let load = self.load_resource(resource.as_ref(), &rows).await?;
            info.resources.push(load);
        }

        let info = info.with_duration(start_time.elapsed());
        info.log_summary();
        Ok(info)
    }

    async fn load_resource(
        &self,
        resource: &dyn Resource,
        rows: &RowBuilder,
    ) -> Result<ResourceLoad> {
        let name = resource.name();
        crate::log_resource_start!(name, resource.path().display());

        let stream = match resource.extract() {
            Ok(stream) => stream,
            Err(e) => match self.settings.on_source_error {
                SourceErrorPolicy::Skip => {
                    tracing::error!(
                        resource = %name,
                        path = %e.path().display(),
                        error = %e,
                        "Skipping resource"
                    );
                    return Ok(ResourceLoad::skipped(name.clone(), e.to_string()));
                }
                SourceErrorPolicy::Fail => return Err(e.into()),
            },
        };

        if self.settings.dry_run {
            tracing::debug!(resource = %name, "DRY RUN: Would create table");
        } else {
            self.destination
                .ensure_table_exists(&self.settings.dataset, name)
                .await?;
        }

        let mut batcher = RowBatcher::new(self.settings.batch_size);
        let mut totals = BatchResult::new();
        let mut extracted: u64 = 0;
        let mut batches = 0usize;

        for record in stream {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    tracing::error!(
                        resource = %name,
                        records_before_error = extracted,
                        error = %e,
                        "Aborting run on malformed record stream"
                    );
                    return Err(e);
                }
            };

            let row = rows.build(extracted, record)?;
            extracted += 1;

            if let Some(batch) = batcher.push(row) {
                batches += 1;
                totals.merge(self.flush(name, batches, batch).await?);
            }
        }

        if let Some(batch) = batcher.finish() {
            batches += 1;
            totals.merge(self.flush(name, batches, batch).await?);
        }

        let rows_extracted = usize::try_from(extracted).unwrap_or(usize::MAX);
        crate::log_resource_complete!(name, rows_extracted, totals.loaded, totals.failed);

        Ok(ResourceLoad {
            name: name.clone(),
            status: if rows_extracted == 0 {
                ResourceStatus::Empty
            } else {
                ResourceStatus::Loaded
            },
            rows_extracted,
            rows_loaded: totals.loaded,
            rows_failed: totals.failed,
            errors: totals.errors,
        })
    }

    async fn flush(
        &self,
        table: &ResourceName,
        batch_number: usize,
        batch: Vec<LoadRow>,
    ) -> Result<BatchResult> {
        crate::log_batch_flush!(table, batch_number, batch.len());

        if self.settings.dry_run {
            tracing::debug!(
                resource = %table,
                rows = batch.len(),
                "DRY RUN: Would insert rows"
            );
            return Ok(BatchResult::simulated(batch.len()));
        }

        let result = self
            .destination
            .insert_rows(&self.settings.dataset, table, batch)
            .await?;
        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::destination::InsertResult;
    use crate::core::source::{JsonFileResource, OrderItemsResource};
    use crate::domain::LoaderError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every call it receives
    #[derive(Default)]
    struct RecordingDestination {
        calls: Mutex<Vec<String>>,
        inserted: Mutex<Vec<LoadRow>>,
    }

    impl RecordingDestination {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Destination for RecordingDestination {
        fn name(&self) -> &str {
            "recording"
        }

        async fn test_connection(&self) -> Result<()> {
            self.calls.lock().unwrap().push("test_connection".to_string());
            Ok(())
        }

        async fn ensure_dataset_exists(&self, dataset: &DatasetName) -> Result<()> {
            self.calls.lock().unwrap().push(format!("dataset {dataset}"));
            Ok(())
        }

        async fn ensure_table_exists(
            &self,
            _dataset: &DatasetName,
            table: &ResourceName,
        ) -> Result<()> {
            self.calls.lock().unwrap().push(format!("table {table}"));
            Ok(())
        }

        async fn insert_rows(
            &self,
            _dataset: &DatasetName,
            table: &ResourceName,
            rows: Vec<LoadRow>,
        ) -> Result<InsertResult> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("insert {table} {}", rows.len()));
            let count = rows.len();
            self.inserted.lock().unwrap().extend(rows);
            Ok(InsertResult::all_succeeded(count))
        }
    }

    fn settings(batch_size: usize) -> PipelineSettings {
        PipelineSettings {
            pipeline_name: "test_pipeline".to_string(),
            dataset: DatasetName::new("shopify_sales").unwrap(),
            batch_size,
            on_source_error: SourceErrorPolicy::Skip,
            dry_run: false,
        }
    }

    fn write(dir: &Path, file: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(file);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn products(dir: &Path, count: usize) -> Box<dyn Resource> {
        let records: Vec<_> = (0..count).map(|i| json!({"product_id": i})).collect();
        let path = write(dir, "product_data.json", &json!(records).to_string());
        Box::new(JsonFileResource::new(
            ResourceName::new("raw_products").unwrap(),
            path,
        ))
    }

    #[tokio::test]
    async fn test_run_batches_rows() {
        let dir = TempDir::new().unwrap();
        let destination = Arc::new(RecordingDestination::default());
        let source = Source::new("test", vec![products(dir.path(), 5)]);

        let pipeline = Pipeline::new(settings(2), destination.clone());
        let info = pipeline.run(&source).await.unwrap();

        assert_eq!(
            destination.calls(),
            vec![
                "test_connection",
                "dataset shopify_sales",
                "table raw_products",
                "insert raw_products 2",
                "insert raw_products 2",
                "insert raw_products 1",
            ]
        );
        assert_eq!(info.total_rows_loaded(), 5);
        assert!(info.is_successful());

        let inserted = destination.inserted.lock().unwrap();
        let indices: Vec<u64> = inserted.iter().map(|r| r.record_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(inserted.iter().all(|r| r.load_id == info.load_id));
    }

    #[tokio::test]
    async fn test_run_skips_missing_file_and_continues() {
        let dir = TempDir::new().unwrap();
        let destination = Arc::new(RecordingDestination::default());
        let missing: Box<dyn Resource> = Box::new(JsonFileResource::new(
            ResourceName::new("raw_customers").unwrap(),
            dir.path().join("customer_data.json"),
        ));
        let source = Source::new("test", vec![missing, products(dir.path(), 1)]);

        let pipeline = Pipeline::new(settings(10), destination.clone());
        let info = pipeline.run(&source).await.unwrap();

        assert_eq!(info.resources.len(), 2);
        assert!(info.resources[0].is_skipped());
        assert_eq!(info.resources[1].rows_loaded, 1);
        assert!(!destination.calls().contains(&"table raw_customers".to_string()));
        assert!(!info.is_successful());
    }

    #[tokio::test]
    async fn test_run_fail_policy_propagates_source_error() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "order_data.json", "{ not json");
        let resource: Box<dyn Resource> = Box::new(OrderItemsResource::new(
            ResourceName::new("raw_orders").unwrap(),
            path,
        ));
        let source = Source::new("test", vec![resource]);

        let mut settings = settings(10);
        settings.on_source_error = SourceErrorPolicy::Fail;
        let pipeline = Pipeline::new(settings, Arc::new(RecordingDestination::default()));

        let result = pipeline.run(&source).await;
        assert!(matches!(result, Err(LoaderError::Source(_))));
    }

    #[tokio::test]
    async fn test_run_aborts_on_structural_error() {
        let dir = TempDir::new().unwrap();
        let orders = json!([
            {"order_id": "A1", "items": [{"sku": "x"}]},
            {"order_id": "A2", "items": "not a list"}
        ]);
        let path = write(dir.path(), "order_data.json", &orders.to_string());
        let resource: Box<dyn Resource> = Box::new(OrderItemsResource::new(
            ResourceName::new("raw_orders").unwrap(),
            path,
        ));
        let source = Source::new("test", vec![resource]);

        let pipeline = Pipeline::new(settings(10), Arc::new(RecordingDestination::default()));
        let result = pipeline.run(&source).await;
        assert!(matches!(result, Err(LoaderError::RecordShape(_))));
    }

    #[tokio::test]
    async fn test_dry_run_never_calls_destination() {
        let dir = TempDir::new().unwrap();
        let destination = Arc::new(RecordingDestination::default());
        let source = Source::new("test", vec![products(dir.path(), 3)]);

        let mut settings = settings(2);
        settings.dry_run = true;
        let info = Pipeline::new(settings, destination.clone())
            .run(&source)
            .await
            .unwrap();

        assert!(destination.calls().is_empty());
        assert!(info.dry_run);
        assert_eq!(info.total_rows_loaded(), 3);
    }

    #[tokio::test]
    async fn test_empty_resource_is_reported_empty() {
        let dir = TempDir::new().unwrap();
        let destination = Arc::new(RecordingDestination::default());
        let source = Source::new("test", vec![products(dir.path(), 0)]);

        let info = Pipeline::new(settings(10), destination.clone())
            .run(&source)
            .await
            .unwrap();

        assert_eq!(info.resources[0].status, ResourceStatus::Empty);
        assert!(!destination
            .calls()
            .iter()
            .any(|call| call.starts_with("insert")));
    }
}
