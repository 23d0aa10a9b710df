//! Warehouse destinations for shoploader.
//!
//! This module provides the adapters that receive pipeline output:
//!
//! - [`destination`] - Destination abstraction layer (trait-based) and factory
//! - [`bigquery`] - Google BigQuery over the REST API
//! - [`postgresql`] - PostgreSQL via a pooled `tokio-postgres` client
//! - [`filesystem`] - JSON Lines files on local disk
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. The pipeline only ever sees an
//! `Arc<dyn Destination>`:
//!
//! ```rust,no_run
//! use shoploader::adapters::destination::create_destination;
//! use shoploader::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shoploader.toml")?;
//! let destination = create_destination(&config).await?;
//! destination.test_connection().await?;
//! # Ok(())
//! # }
//! ```

pub mod bigquery;
pub mod destination;
pub mod filesystem;
pub mod postgresql;
