// shoploader - mock Shopify data to warehouse loader
// Copyright (c) 2025 shoploader contributors
// Licensed under the MIT License

use clap::Parser;
use shoploader::cli::commands::EXIT_FATAL;
use shoploader::cli::{Cli, Commands};
use shoploader::config::LoggingConfig;
use shoploader::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = cli.effective_log_level();
    let logging_config = match &cli.log_dir {
        Some(dir) => LoggingConfig::with_local_dir(dir.clone()),
        None => LoggingConfig::console_only(),
    };
    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "shoploader - mock Shopify data to warehouse loader"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors, so flush the file logger first
    drop(logging_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
