//! Local filesystem destination
//!
//! Layout: `<bucket_path>/<dataset>/<table>/<load_id>.jsonl`, one envelope
//! row per line. Each pipeline run appends to its own file.

use crate::adapters::destination::traits::{Destination, InsertResult};
use crate::config::schema::FilesystemConfig;
use crate::domain::ids::{DatasetName, LoadId, ResourceName};
use crate::domain::records::LoadRow;
use crate::domain::{LoaderError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// JSON Lines files under a root directory
pub struct FilesystemDestination {
    root: PathBuf,
}

impl FilesystemDestination {
    /// Create a destination writing under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a destination from configuration
    pub fn from_config(config: &FilesystemConfig) -> Self {
        Self::new(config.bucket_path.clone())
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a table's files
    pub fn table_dir(&self, dataset: &DatasetName, table: &ResourceName) -> PathBuf {
        self.root.join(dataset.as_str()).join(table.as_str())
    }

    /// File a load writes a table's rows to
    pub fn table_file(
        &self,
        dataset: &DatasetName,
        table: &ResourceName,
        load_id: &LoadId,
    ) -> PathBuf {
        self.table_dir(dataset, table)
            .join(format!("{}.jsonl", load_id.as_str()))
    }

    async fn create_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).await.map_err(|e| {
            LoaderError::Destination(format!("Cannot create directory {}: {e}", dir.display()))
        })
    }
}

#[async_trait]
impl Destination for FilesystemDestination {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn test_connection(&self) -> Result<()> {
        self.create_dir(&self.root).await?;

        let metadata = fs::metadata(&self.root).await.map_err(|e| {
            LoaderError::Destination(format!("Cannot stat {}: {e}", self.root.display()))
        })?;
        if metadata.permissions().readonly() {
            return Err(LoaderError::Destination(format!(
                "Destination directory {} is read-only",
                self.root.display()
            )));
        }

        tracing::info!(root = %self.root.display(), "Filesystem destination ready");
        Ok(())
    }

    async fn ensure_dataset_exists(&self, dataset: &DatasetName) -> Result<()> {
        self.create_dir(&self.root.join(dataset.as_str())).await
    }

    async fn ensure_table_exists(&self, dataset: &DatasetName, table: &ResourceName) -> Result<()> {
        self.create_dir(&self.table_dir(dataset, table)).await
    }

    async fn insert_rows(
        &self,
        dataset: &DatasetName,
        table: &ResourceName,
        rows: Vec<LoadRow>,
    ) -> Result<InsertResult> {
        let Some(first) = rows.first() else {
            return Ok(InsertResult::default());
        };
        let path = self.table_file(dataset, table, &first.load_id);

        let mut buffer = Vec::new();
        for row in &rows {
            serde_json::to_writer(&mut buffer, row)?;
            buffer.push(b'\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| LoaderError::Io(format!("Failed to open {}: {e}", path.display())))?;
        file.write_all(&buffer)
            .await
            .map_err(|e| LoaderError::Io(format!("Failed to write {}: {e}", path.display())))?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), rows = rows.len(), "Appended rows");
        Ok(InsertResult::all_succeeded(rows.len()))
    }
}
