// shoploader - mock Shopify data to warehouse loader
// Copyright (c) 2025 shoploader contributors
// Licensed under the MIT License

//! # shoploader - mock Shopify data to warehouse loader
//!
//! shoploader reads mock Shopify exports (JSON files holding arrays of
//! orders, products and customers) and loads them into BigQuery, PostgreSQL
//! or local JSON Lines files.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** records from JSON array files, one resource per file
//! - **Transforming** orders into one record per line item, paired with the
//!   order it belongs to
//! - **Loading** records in batches into one table per resource
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (sources, flattening, pipeline)
//! - [`adapters`] - Destinations (BigQuery, PostgreSQL, filesystem)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shoploader::adapters::destination::create_destination;
//! use shoploader::config::load_config;
//! use shoploader::core::load::{Pipeline, PipelineSettings};
//! use shoploader::core::source::Source;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("shoploader.toml")?;
//!     let destination = create_destination(&config).await?;
//!
//!     let pipeline = Pipeline::new(PipelineSettings::from_config(&config), destination);
//!     let info = pipeline.run(&Source::from_config(&config.source)).await?;
//!
//!     println!("Loaded {} rows", info.total_rows_loaded());
//!     Ok(())
//! }
//! ```
//!
//! ## Flattening
//!
//! ```rust
//! use serde_json::json;
//! use shoploader::core::transform::flatten_order_items;
//!
//! let orders = vec![json!({
//!     "order_id": "A1",
//!     "items": [{"sku": "x"}, {"sku": "y"}]
//! })];
//!
//! let pairs: Vec<_> = flatten_order_items(orders)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(pairs.len(), 2);
//! assert_eq!(pairs[1].item["order_id"], json!("A1"));
//! assert!(!pairs[0].order.contains_key("items"));
//! ```
//!
//! ## Error Handling
//!
//! The library uses [`domain::LoaderError`] for all errors. A missing or
//! malformed source file is a [`domain::SourceError`], which the pipeline
//! logs and skips by default; malformed order structure is a
//! [`domain::RecordShapeError`], which always aborts the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
