//! Run command implementation
//!
//! This module implements the `run` command, which loads the configured
//! resources into the configured destination.

use super::{EXIT_CONFIG, EXIT_DESTINATION, EXIT_FAILED_ROWS, EXIT_FATAL, EXIT_OK};
use crate::adapters::destination::create_destination;
use crate::config::load_config;
use crate::config::schema::{ShoploaderConfig, SourceErrorPolicy};
use crate::core::load::{LoadInfo, Pipeline, PipelineSettings};
use crate::core::source::Source;
use crate::domain::LoaderError;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Dry run mode - read and transform, but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Abort when a source file is missing or malformed instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Only load these resources (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "NAME")]
    pub resource: Vec<String>,

    /// Override the number of rows per destination write
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Err(e) = self.apply_overrides(&mut config) {
            tracing::error!(error = %e, "Invalid command-line override");
            eprintln!("❌ {e}");
            return Ok(EXIT_CONFIG);
        }

        let source = match Source::from_config(&config.source).select(&self.resource) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written to the destination");
            println!();
        }

        let destination = match create_destination(&config).await {
            Ok(destination) => destination,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create destination");
                eprintln!("❌ Failed to initialize destination: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        println!(
            "🚀 Loading {} resource(s) from {} into {} ({})",
            source.len(),
            config.source.data_dir.display(),
            config.destination,
            config.pipeline.dataset_name
        );
        println!();

        let pipeline = Pipeline::new(PipelineSettings::from_config(&config), destination);
        let info = match pipeline.run(&source).await {
            Ok(info) => info,
            Err(e) => {
                crate::log_error_with_context!(&e, "Pipeline run failed");
                eprintln!("❌ Load failed: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        println!("📊 Load Summary:");
        println!("{info}");
        println!();

        Ok(report_outcome(&info))
    }

    /// Apply command-line flags on top of the loaded configuration
    fn apply_overrides(&self, config: &mut ShoploaderConfig) -> Result<(), String> {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if self.strict {
            tracing::info!("Enabling strict source error handling from CLI");
            config.pipeline.on_source_error = SourceErrorPolicy::Fail;
        }

        if let Some(batch_size) = self.batch_size {
            tracing::info!(batch_size, "Overriding batch size from CLI");
            config.pipeline.batch_size = batch_size;
        }

        config.validate()
    }
}

/// Map a run-aborting error to the process exit code
pub fn exit_code_for_error(error: &LoaderError) -> i32 {
    match error {
        LoaderError::Configuration(_) | LoaderError::Validation(_) => EXIT_CONFIG,
        e if e.is_destination_error() => EXIT_DESTINATION,
        _ => EXIT_FATAL,
    }
}

/// Print the final status line and pick the exit code for a finished run
fn report_outcome(info: &LoadInfo) -> i32 {
    let skipped = info.skipped_resources();

    if info.total_rows_failed() > 0 {
        println!(
            "⚠️  Load completed with {} failed row(s)",
            info.total_rows_failed()
        );
        EXIT_FAILED_ROWS
    } else if !skipped.is_empty() {
        println!(
            "⚠️  Load completed; {} resource(s) skipped",
            skipped.len()
        );
        EXIT_OK
    } else {
        println!("✅ Load completed successfully!");
        EXIT_OK
    }
}
