//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for shoploader using clap.

pub mod commands;

use crate::config::load_config;
use clap::{Parser, Subcommand};

/// shoploader - mock Shopify data to warehouse loader
#[derive(Parser, Debug)]
#[command(name = "shoploader")]
#[command(version, about, long_about = None)]
#[command(author = "shoploader contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "shoploader.toml", env = "SHOPLOADER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SHOPLOADER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Also write JSON logs to this directory
    #[arg(long, env = "SHOPLOADER_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Level logging starts at
    ///
    /// `--log-level` wins, then `application.log_level` from the config file
    /// (when that file loads cleanly), then `info`.
    pub fn effective_log_level(&self) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }

        load_config(&self.config)
            .map(|config| config.application.log_level)
            .unwrap_or_else(|_| "info".to_string())
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the configured resources into the destination
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
