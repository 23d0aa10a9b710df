//! Destination factory
//!
//! This module provides the factory function that creates the destination
//! selected by configuration.

use crate::adapters::bigquery::{BigQueryAdapter, BigQueryClient};
use crate::adapters::destination::traits::Destination;
use crate::adapters::filesystem::FilesystemDestination;
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::config::schema::{DestinationKind, ShoploaderConfig};
use crate::domain::{LoaderError, Result};
use std::sync::Arc;

/// Create a destination based on the configuration
///
/// This factory function examines the top-level `destination` key and builds
/// the matching backend. No network traffic happens here; connections are
/// established lazily by the first destination call.
///
/// # Errors
///
/// Returns an error if the selected destination has no configuration section
/// or its client cannot be created.
pub async fn create_destination(config: &ShoploaderConfig) -> Result<Arc<dyn Destination>> {
    match config.destination {
        DestinationKind::BigQuery => {
            let bq_config = config
                .bigquery
                .as_ref()
                .ok_or_else(|| missing_section(DestinationKind::BigQuery))?;

            tracing::info!(project = %bq_config.project_id, "Creating BigQuery destination");
            let max_rows = bq_config.max_rows_per_request;
            let client = BigQueryClient::new(bq_config.clone())?;

            Ok(Arc::new(BigQueryAdapter::new(client, max_rows)) as Arc<dyn Destination>)
        }
        DestinationKind::PostgreSQL => {
            let pg_config = config
                .postgresql
                .as_ref()
                .ok_or_else(|| missing_section(DestinationKind::PostgreSQL))?;

            tracing::info!("Creating PostgreSQL destination");
            let client = PostgreSQLClient::new(pg_config.clone())?;

            Ok(Arc::new(PostgreSQLAdapter::new(client)) as Arc<dyn Destination>)
        }
        DestinationKind::Filesystem => {
            let fs_config = config
                .filesystem
                .as_ref()
                .ok_or_else(|| missing_section(DestinationKind::Filesystem))?;

            tracing::info!(
                bucket_path = %fs_config.bucket_path.display(),
                "Creating filesystem destination"
            );
            Ok(Arc::new(FilesystemDestination::from_config(fs_config)) as Arc<dyn Destination>)
        }
    }
}

fn missing_section(kind: DestinationKind) -> LoaderError {
    LoaderError::Configuration(format!(
        "[{kind}] configuration is required when destination = '{kind}'"
    ))
}
