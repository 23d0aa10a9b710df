//! Core business logic for shoploader.
//!
//! # Modules
//!
//! - [`source`] - Resources reading JSON files, grouped into a source
//! - [`transform`] - Order to line-item flattening
//! - [`load`] - Pipeline orchestration, batching and the load summary
//!
//! # Load Workflow
//!
//! 1. **Connect**: test the destination and create the dataset
//! 2. **Extract**: read each resource's JSON file into a record stream
//! 3. **Transform**: flatten orders into line items where configured
//! 4. **Batch**: wrap records in envelopes and write them in batches
//! 5. **Report**: return a [`load::LoadInfo`] summary
//!
//! # Example
//!
//! ```rust,no_run
//! use shoploader::adapters::destination::create_destination;
//! use shoploader::config::load_config;
//! use shoploader::core::load::{Pipeline, PipelineSettings};
//! use shoploader::core::source::Source;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shoploader.toml")?;
//! let destination = create_destination(&config).await?;
//! let source = Source::from_config(&config.source);
//!
//! let pipeline = Pipeline::new(PipelineSettings::from_config(&config), destination);
//! let info = pipeline.run(&source).await?;
//!
//! println!("{info}");
//! # Ok(())
//! # }
//! ```

pub mod load;
pub mod source;
pub mod transform;
