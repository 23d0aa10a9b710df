//! PostgreSQL client implementation
//!
//! This module provides the pooled client used by the PostgreSQL destination.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{LoaderError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::NoTls;

/// TLS settings derived from `ssl_mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TlsSettings {
    ssl_mode: SslMode,
    verify_certificate: bool,
    verify_hostname: bool,
}

impl TlsSettings {
    fn from_ssl_mode(ssl_mode: &str) -> Result<Self> {
        let (mode, verify_certificate, verify_hostname) = match ssl_mode {
            "disable" => (SslMode::Disable, false, false),
            "allow" | "prefer" => (SslMode::Prefer, false, false),
            "require" => (SslMode::Require, false, false),
            "verify-ca" => (SslMode::Require, true, false),
            "verify-full" => (SslMode::Require, true, true),
            other => {
                return Err(LoaderError::Configuration(format!(
                    "Unsupported PostgreSQL ssl_mode '{other}'"
                )))
            }
        };

        Ok(Self {
            ssl_mode: mode,
            verify_certificate,
            verify_hostname,
        })
    }

    fn connector(&self) -> Result<MakeTlsConnector> {
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(!self.verify_certificate)
            .danger_accept_invalid_hostnames(!self.verify_hostname)
            .build()
            .map_err(|e| LoaderError::Database(format!("Failed to build TLS connector: {e}")))?;
        Ok(MakeTlsConnector::new(connector))
    }
}

/// PostgreSQL client for shoploader
///
/// Wraps a connection pool; every connection handed out has the configured
/// statement timeout applied.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool connects lazily, so this does not touch the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed or the
    /// pool cannot be built.
    pub fn new(config: PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                LoaderError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let tls = TlsSettings::from_ssl_mode(&config.ssl_mode)?;
        pg_config.ssl_mode(tls.ssl_mode);

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if tls.ssl_mode == SslMode::Disable {
            Manager::from_config(pg_config, NoTls, manager_config)
        } else {
            Manager::from_config(pg_config, tls.connector()?, manager_config)
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                LoaderError::Database(format!("Failed to create connection pool: {e}"))
            })?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| LoaderError::Database(format!("Connection test failed: {e}")))?;

        tracing::info!(
            server = %self.connection_string_safe(),
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<Object> {
        let client = self.pool.get().await.map_err(|e| {
            LoaderError::Database(format!("Failed to get connection from pool: {e}"))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client
            .batch_execute(&timeout_query)
            .await
            .map_err(|e| LoaderError::Database(format!("Failed to set statement timeout: {e}")))?;

        Ok(client)
    }

    /// Run one or more statements without parameters
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub async fn batch_execute(&self, sql: &str) -> Result<()> {
        let client = self.get_connection().await?;
        client
            .batch_execute(sql)
            .await
            .map_err(|e| LoaderError::Database(format!("Statement execution failed: {e}")))
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> String {
        redact_connection_string(self.config.connection_string.expose_secret().as_ref())
    }
}

/// Replace the credentials part of a connection string with `***`
pub fn redact_connection_string(connection_string: &str) -> String {
    match connection_string.rsplit_once('@') {
        Some((_, host)) => format!("postgresql://***@{host}"),
        None => "postgresql://***".to_string(),
    }
}
