//! JSON array file reader

use crate::domain::errors::SourceError;
use crate::domain::records::json_type_name;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;

/// Read a file holding a single top-level JSON array
///
/// The whole file is read into memory before parsing.
///
/// # Errors
///
/// - [`SourceError::NotFound`] if the file does not exist
/// - [`SourceError::Read`] for any other I/O failure
/// - [`SourceError::MalformedJson`] if the content is not valid JSON
///   (including invalid UTF-8 and truncated input)
/// - [`SourceError::NotAnArray`] if the top-level value is not an array
pub fn read_json_array(path: &Path) -> Result<Vec<Value>, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SourceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    let value: Value = serde_json::from_slice(&bytes).map_err(|e| SourceError::MalformedJson {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Array(records) => {
            tracing::info!(
                path = %path.display(),
                count = records.len(),
                "Read JSON records"
            );
            Ok(records)
        }
        other => Err(SourceError::NotAnArray {
            path: path.to_path_buf(),
            found: json_type_name(&other),
        }),
    }
}
