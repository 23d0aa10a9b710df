//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Sample configuration written by `init`
pub const CONFIG_TEMPLATE: &str = include_str!("../../../shoploader.toml");

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "shoploader.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing shoploader configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, CONFIG_TEMPLATE) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Put the mock JSON files in the data/ directory next to it");
                println!("  2. Set destination to 'filesystem', 'bigquery' or 'postgresql'");
                println!("  3. Put credentials in a .env file:");
                println!("     - SHOPLOADER_BIGQUERY_ACCESS_TOKEN (if using BigQuery)");
                println!("     - SHOPLOADER_PG_PASSWORD (if using PostgreSQL)");
                println!("  4. Validate configuration: shoploader validate-config");
                println!("  5. Try it without writing: shoploader run --dry-run");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DestinationKind, ShoploaderConfig};
    use tempfile::TempDir;

    #[test]
    fn test_template_is_valid_config() {
        let config: ShoploaderConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.destination, DestinationKind::Filesystem);
        let names: Vec<&str> = config
            .source
            .resources
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["raw_shopify_mock_data", "raw_orders", "raw_products", "raw_customers"]
        );
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("shoploader.toml");
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), EXIT_OK);
        assert_eq!(fs::read_to_string(&output).unwrap(), CONFIG_TEMPLATE);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("shoploader.toml");
        fs::write(&output, "# mine").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# mine");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), EXIT_OK);
        assert_eq!(fs::read_to_string(&output).unwrap(), CONFIG_TEMPLATE);
    }
}
