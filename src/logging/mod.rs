//! Logging and observability
//!
//! Structured logging through `tracing`: human-readable console output plus
//! optional JSON log files with rotation.
//!
//! # Example
//!
//! ```no_run
//! use shoploader::logging::init_logging;
//! use shoploader::config::LoggingConfig;
//!
//! let config = LoggingConfig::console_only();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(resource = "raw_products", "Loading resource");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a resource load
///
/// # Example
///
/// ```no_run
/// use shoploader::log_resource_start;
/// use shoploader::domain::ResourceName;
///
/// let name = ResourceName::new("raw_products").unwrap();
/// log_resource_start!(&name, "data/product_data.json");
/// ```
#[macro_export]
macro_rules! log_resource_start {
    ($resource:expr, $path:expr) => {
        tracing::info!(
            resource = %$resource,
            path = %$path,
            "Loading resource"
        );
    };
}

/// Log the completion of a resource load
///
/// # Example
///
/// ```no_run
/// use shoploader::log_resource_complete;
///
/// log_resource_complete!("raw_products", 42, 42, 0);
/// ```
#[macro_export]
macro_rules! log_resource_complete {
    ($resource:expr, $extracted:expr, $loaded:expr, $failed:expr) => {
        tracing::info!(
            resource = %$resource,
            extracted = $extracted,
            loaded = $loaded,
            failed = $failed,
            "Resource loaded"
        );
    };
}

/// Log a batch handed to the destination
///
/// # Example
///
/// ```no_run
/// use shoploader::log_batch_flush;
///
/// log_batch_flush!("raw_orders", 3, 500);
/// ```
#[macro_export]
macro_rules! log_batch_flush {
    ($resource:expr, $batch:expr, $rows:expr) => {
        tracing::debug!(
            resource = %$resource,
            batch = $batch,
            rows = $rows,
            "Flushing batch"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use shoploader::log_error_with_context;
/// use shoploader::domain::LoaderError;
///
/// let error = LoaderError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
