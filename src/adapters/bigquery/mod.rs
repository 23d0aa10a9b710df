//! BigQuery destination over the REST API v2
//!
//! A dataset maps to a BigQuery dataset and each resource to a table in it.
//! Rows are written with streaming inserts (`tabledata.insertAll`), using the
//! row's `record_id` as the insert id.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::BigQueryAdapter;
pub use client::BigQueryClient;
