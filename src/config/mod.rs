//! Configuration management for shoploader.
//!
//! shoploader uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SHOPLOADER_<SECTION>_<KEY>` environment overrides
//! - Default values for everything except the destination credentials
//! - Validation of the selected destination section
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use shoploader::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shoploader.toml")?;
//!
//! println!("Destination: {}", config.destination);
//! println!("Dataset: {}", config.pipeline.dataset_name);
//! for resource in &config.source.resources {
//!     println!("  {} <- {}", resource.name, resource.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! destination = "bigquery"
//!
//! [pipeline]
//! pipeline_name = "shopify_mock_pipeline"
//! dataset_name = "shopify_sales"
//!
//! [source]
//! data_dir = "data"
//!
//! [bigquery]
//! project_id = "acme-analytics"
//! access_token = "${SHOPLOADER_BIGQUERY_ACCESS_TOKEN}"
//! ```
//!
//! Without `[[source.resources]]` entries the four mock files are loaded:
//! `shopify_mock_data.json`, `order_data.json` (flattened into order line
//! items), `product_data.json` and `customer_data.json`.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BigQueryConfig, DestinationKind, FilesystemConfig, LoggingConfig,
    PipelineConfig, PostgreSQLConfig, ResourceConfig, ResourceKind, ShoploaderConfig,
    SourceConfig, SourceErrorPolicy,
};
pub use secret::{secret_string, SecretString, SecretValue};
