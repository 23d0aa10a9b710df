//! Domain error types
//!
//! This module defines the error hierarchy for shoploader.
//! All errors are domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main shoploader error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A source file could not be turned into a record stream
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Input records do not have the shape the transformation needs
    #[error("Record shape error: {0}")]
    RecordShape(#[from] RecordShapeError),

    /// BigQuery-related errors
    #[error("BigQuery error: {0}")]
    BigQuery(#[from] BigQueryError),

    /// Database-related errors (generic)
    #[error("Database error: {0}")]
    Database(String),

    /// Destination setup errors (unreachable or unwritable target)
    #[error("Destination error: {0}")]
    Destination(String),

    /// Load process errors
    #[error("Load error: {0}")]
    Load(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl LoaderError {
    /// Whether the error came from talking to (or preparing) the destination
    pub fn is_destination_error(&self) -> bool {
        matches!(
            self,
            LoaderError::BigQuery(_) | LoaderError::Database(_) | LoaderError::Destination(_)
        )
    }
}

/// Errors raised while turning a JSON file into a record stream
///
/// Under the default policy these are logged and the affected resource is
/// skipped; they never abort a whole run unless strict mode is requested.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source file does not exist
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// The file is not valid JSON
    #[error("Malformed JSON in {}: {message}", path.display())]
    MalformedJson { path: PathBuf, message: String },

    /// The file is valid JSON but its top level is not an array
    #[error("Expected a JSON array in {}, found {found}", path.display())]
    NotAnArray { path: PathBuf, found: &'static str },
}

impl SourceError {
    /// Path of the file that failed
    pub fn path(&self) -> &PathBuf {
        match self {
            SourceError::NotFound { path }
            | SourceError::Read { path, .. }
            | SourceError::MalformedJson { path, .. }
            | SourceError::NotAnArray { path, .. } => path,
        }
    }
}

/// Structural problems in order records
///
/// Indices are 0-based positions in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordShapeError {
    /// An order is not a JSON object
    #[error("order #{order_index} is not a JSON object (found {found})")]
    OrderNotObject {
        order_index: usize,
        found: &'static str,
    },

    /// An order's `items` field is present but not an array
    #[error("order #{order_index} has an `items` field that is not an array (found {found})")]
    ItemsNotArray {
        order_index: usize,
        found: &'static str,
    },

    /// A line item is not a JSON object
    #[error("item #{item_index} of order #{order_index} is not a JSON object (found {found})")]
    ItemNotObject {
        order_index: usize,
        item_index: usize,
        found: &'static str,
    },

    /// An order with line items has no `order_id`
    #[error("order #{order_index} has line items but no `order_id`")]
    MissingOrderId { order_index: usize },
}

/// BigQuery-specific errors
///
/// Errors that occur when interacting with the BigQuery REST API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum BigQueryError {
    /// Failed to reach the API
    #[error("Failed to connect to BigQuery: {0}")]
    ConnectionFailed(String),

    /// Access token rejected (401/403)
    #[error("Authentication failed: {status} - {message}")]
    AuthenticationFailed { status: u16, message: String },

    /// Dataset could not be created
    #[error("Failed to create dataset: {0}")]
    DatasetCreationFailed(String),

    /// Table could not be created
    #[error("Failed to create table: {0}")]
    TableCreationFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl BigQueryError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => BigQueryError::AuthenticationFailed { status, message },
            500..=599 => BigQueryError::ServerError { status, message },
            _ => BigQueryError::ClientError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        LoaderError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LoaderError {
    fn from(err: toml::de::Error) -> Self {
        LoaderError::Configuration(format!("TOML parse error: {err}"))
    }
}
