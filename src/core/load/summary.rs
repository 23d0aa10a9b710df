//! Load summary and reporting
//!
//! This module defines structures for tracking and reporting the result of a
//! pipeline run.

use crate::domain::ids::{DatasetName, LoadId, ResourceName};
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Outcome of one resource in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Records were extracted and handed to the destination
    Loaded,
    /// The resource produced no records
    Empty,
    /// The source file could not be read; nothing was loaded
    Skipped { reason: String },
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceStatus::Loaded => f.write_str("loaded"),
            ResourceStatus::Empty => f.write_str("empty"),
            ResourceStatus::Skipped { reason } => write!(f, "skipped ({reason})"),
        }
    }
}

/// Per-resource counts
#[derive(Debug, Clone)]
pub struct ResourceLoad {
    /// Resource (and table) name
    pub name: ResourceName,

    /// How the resource ended
    pub status: ResourceStatus,

    /// Records pulled from the stream
    pub rows_extracted: usize,

    /// Rows the destination accepted
    pub rows_loaded: usize,

    /// Rows the destination rejected
    pub rows_failed: usize,

    /// Messages for rejected rows
    pub errors: Vec<String>,
}

impl ResourceLoad {
    /// A resource whose source could not be opened
    pub fn skipped(name: ResourceName, reason: impl Into<String>) -> Self {
        Self {
            name,
            status: ResourceStatus::Skipped {
                reason: reason.into(),
            },
            rows_extracted: 0,
            rows_loaded: 0,
            rows_failed: 0,
            errors: Vec::new(),
        }
    }

    /// Whether the resource was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ResourceStatus::Skipped { .. })
    }
}

/// Summary of a pipeline run
#[derive(Debug, Clone)]
pub struct LoadInfo {
    /// Pipeline name
    pub pipeline_name: String,

    /// Destination dataset
    pub dataset: DatasetName,

    /// Destination name (`bigquery`, `postgresql`, `filesystem`)
    pub destination: String,

    /// Load id shared by every row of the run
    pub load_id: LoadId,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Duration of the run
    pub duration: Duration,

    /// Whether destination writes were skipped
    pub dry_run: bool,

    /// Per-resource results, in processing order
    pub resources: Vec<ResourceLoad>,
}

impl LoadInfo {
    /// Create an empty summary for a run
    pub fn new(
        pipeline_name: impl Into<String>,
        dataset: DatasetName,
        destination: impl Into<String>,
        load_id: LoadId,
        started_at: DateTime<Utc>,
        dry_run: bool,
    ) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            dataset,
            destination: destination.into(),
            load_id,
            started_at,
            duration: Duration::from_secs(0),
            dry_run,
            resources: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Rows accepted across all resources
    pub fn total_rows_loaded(&self) -> usize {
        self.resources.iter().map(|r| r.rows_loaded).sum()
    }

    /// Rows rejected across all resources
    pub fn total_rows_failed(&self) -> usize {
        self.resources.iter().map(|r| r.rows_failed).sum()
    }

    /// Records extracted across all resources
    pub fn total_rows_extracted(&self) -> usize {
        self.resources.iter().map(|r| r.rows_extracted).sum()
    }

    /// Resources that were skipped because their source could not be read
    pub fn skipped_resources(&self) -> Vec<&ResourceLoad> {
        self.resources.iter().filter(|r| r.is_skipped()).collect()
    }

    /// Check if the run was successful (no failed rows, nothing skipped)
    pub fn is_successful(&self) -> bool {
        self.total_rows_failed() == 0 && self.skipped_resources().is_empty()
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.total_rows_loaded() + self.total_rows_failed();
        if attempted == 0 {
            return 100.0;
        }
        (self.total_rows_loaded() as f64 / attempted as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            pipeline = %self.pipeline_name,
            dataset = %self.dataset,
            destination = %self.destination,
            load_id = %self.load_id,
            dry_run = self.dry_run,
            resources = self.resources.len(),
            rows_loaded = self.total_rows_loaded(),
            rows_failed = self.total_rows_failed(),
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Load completed"
        );

        for resource in &self.resources {
            match &resource.status {
                ResourceStatus::Skipped { reason } => {
                    tracing::warn!(resource = %resource.name, reason = %reason, "Resource skipped");
                }
                _ if resource.rows_failed > 0 => {
                    tracing::warn!(
                        resource = %resource.name,
                        failed = resource.rows_failed,
                        "Resource completed with failed rows"
                    );
                    for error in &resource.errors {
                        tracing::warn!(resource = %resource.name, error = %error, "Row error");
                    }
                }
                _ => {}
            }
        }
    }
}

impl fmt::Display for LoadInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pipeline {} load {} to {} dataset {}{}",
            self.pipeline_name,
            self.load_id,
            self.destination,
            self.dataset,
            if self.dry_run { " (dry run)" } else { "" }
        )?;

        for resource in &self.resources {
            writeln!(
                f,
                "  {:<20} {:<10} extracted {:>6}  loaded {:>6}  failed {:>6}",
                resource.name.as_str(),
                match resource.status {
                    ResourceStatus::Skipped { .. } => "skipped".to_string(),
                    ref status => status.to_string(),
                },
                resource.rows_extracted,
                resource.rows_loaded,
                resource.rows_failed
            )?;
            if let ResourceStatus::Skipped { reason } = &resource.status {
                writeln!(f, "    reason: {reason}")?;
            }
        }

        write!(
            f,
            "Total: {} loaded, {} failed in {:.2}s",
            self.total_rows_loaded(),
            self.total_rows_failed(),
            self.duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn load_info() -> LoadInfo {
        let started_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        LoadInfo::new(
            "shopify_mock_pipeline",
            DatasetName::new("shopify_sales").unwrap(),
            "filesystem",
            LoadId::from_timestamp(started_at),
            started_at,
            false,
        )
    }

    fn loaded(name: &str, loaded: usize, failed: usize) -> ResourceLoad {
        ResourceLoad {
            name: ResourceName::new(name).unwrap(),
            status: ResourceStatus::Loaded,
            rows_extracted: loaded + failed,
            rows_loaded: loaded,
            rows_failed: failed,
            errors: (0..failed).map(|i| format!("row {i} rejected")).collect(),
        }
    }

    #[test]
    fn test_load_info_creation() {
        let info = load_info();

        assert!(info.resources.is_empty());
        assert_eq!(info.duration, Duration::from_secs(0));
        assert_eq!(info.total_rows_loaded(), 0);
        assert!(info.is_successful());
        assert_eq!(info.success_rate(), 100.0);
    }

    #[test]
    fn test_load_info_totals() {
        let mut info = load_info().with_duration(Duration::from_millis(1500));
        info.resources.push(loaded("raw_products", 10, 0));
        info.resources.push(loaded("raw_orders", 18, 2));

        assert_eq!(info.total_rows_loaded(), 28);
        assert_eq!(info.total_rows_failed(), 2);
        assert_eq!(info.total_rows_extracted(), 30);
        assert!(!info.is_successful());
        assert!((info.success_rate() - 93.333).abs() < 0.01);
    }

    #[test]
    fn test_skipped_resource_is_not_successful() {
        let mut info = load_info();
        info.resources.push(loaded("raw_products", 3, 0));
        info.resources.push(ResourceLoad::skipped(
            ResourceName::new("raw_customers").unwrap(),
            "File not found: data/customer_data.json",
        ));

        let skipped = info.skipped_resources();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].name.as_str(), "raw_customers");
        assert_eq!(info.total_rows_failed(), 0);
        assert!(!info.is_successful());
    }

    #[test]
    fn test_display_lists_resources() {
        let mut info = load_info();
        info.resources.push(loaded("raw_products", 3, 0));
        info.resources.push(ResourceLoad::skipped(
            ResourceName::new("raw_customers").unwrap(),
            "File not found: customer_data.json",
        ));

        let rendered = info.to_string();
        assert!(rendered.starts_with("Pipeline shopify_mock_pipeline load 1700000000.000000"));
        assert!(rendered.contains("raw_products"));
        assert!(rendered.contains("reason: File not found: customer_data.json"));
        assert!(rendered.ends_with("Total: 3 loaded, 0 failed in 0.00s"));
    }

    #[test]
    fn test_resource_status_display() {
        assert_eq!(ResourceStatus::Loaded.to_string(), "loaded");
        assert_eq!(ResourceStatus::Empty.to_string(), "empty");
        assert_eq!(
            ResourceStatus::Skipped {
                reason: "missing".to_string()
            }
            .to_string(),
            "skipped (missing)"
        );
    }
}
