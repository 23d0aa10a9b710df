//! PostgreSQL destination
//!
//! Rows are written to `"<dataset>"."<resource>"` tables through a
//! `deadpool-postgres` connection pool, one transaction per batch.

pub mod adapter;
pub mod client;

pub use adapter::PostgreSQLAdapter;
pub use client::{redact_connection_string, PostgreSQLClient};
