//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the shoploader configuration file.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::adapters::postgresql::redact_connection_string;
use crate::config::load_config;
use crate::config::schema::{DestinationKind, ShoploaderConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a config that loads is valid. Source
    /// files are only checked for existence; a missing file is a warning,
    /// matching how `run` treats it.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config);

        Ok(EXIT_OK)
    }
}

fn print_summary(config: &ShoploaderConfig) {
    println!("Configuration Summary:");
    println!("  Pipeline: {}", config.pipeline.pipeline_name);
    println!("  Dataset: {}", config.pipeline.dataset_name);
    println!("  Batch Size: {}", config.pipeline.batch_size);
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Destination: {}", config.destination);

    match config.destination {
        DestinationKind::BigQuery => {
            if let Some(ref bq_config) = config.bigquery {
                println!("  BigQuery Project: {}", bq_config.project_id);
                println!("  BigQuery Location: {}", bq_config.location);
            }
        }
        DestinationKind::PostgreSQL => {
            if let Some(ref pg_config) = config.postgresql {
                println!(
                    "  PostgreSQL Connection: {}",
                    redact_connection_string(pg_config.connection_string.expose_secret().as_ref())
                );
                println!("  SSL Mode: {}", pg_config.ssl_mode);
                println!("  Max Connections: {}", pg_config.max_connections);
            }
        }
        DestinationKind::Filesystem => {
            if let Some(ref fs_config) = config.filesystem {
                println!("  Bucket Path: {}", fs_config.bucket_path.display());
            }
        }
    }

    println!(
        "  Source: {} ({})",
        config.source.name,
        config.source.data_dir.display()
    );
    for resource in &config.source.resources {
        let path = config.source.resolve_path(resource);
        let marker = if path.is_file() { "✓" } else { "⚠️  missing" };
        println!(
            "    - {} [{}] {} {}",
            resource.name,
            resource.kind.as_str(),
            path.display(),
            marker
        );
    }
    println!();
}
