//! BigQuery REST API v2 payloads
//!
//! Only the fields this loader reads or writes are modelled; unknown fields in
//! responses are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `datasets.insert` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetResource {
    pub dataset_reference: DatasetReference,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String,
}

/// `tables.insert` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResource {
    pub table_reference: TableReference,
    pub schema: TableSchema,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub fields: Vec<TableFieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub mode: String,
}

impl TableFieldSchema {
    fn required(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            mode: "REQUIRED".to_string(),
        }
    }
}

impl TableSchema {
    /// Schema of the envelope every resource table shares
    pub fn envelope() -> Self {
        Self {
            fields: vec![
                TableFieldSchema::required("record_id", "STRING"),
                TableFieldSchema::required("load_id", "STRING"),
                TableFieldSchema::required("record_index", "INTEGER"),
                TableFieldSchema::required("record_hash", "STRING"),
                TableFieldSchema::required("data", "JSON"),
                TableFieldSchema::required("loaded_at", "TIMESTAMP"),
            ],
        }
    }
}

/// `tabledata.insertAll` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllRequest {
    pub skip_invalid_rows: bool,
    pub ignore_unknown_values: bool,
    pub rows: Vec<InsertAllRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllRow {
    /// Deduplication id, the row's `record_id`
    pub insert_id: String,
    pub json: Map<String, Value>,
}

/// `tabledata.insertAll` response body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllResponse {
    #[serde(default)]
    pub insert_errors: Vec<RowInsertErrors>,
}

/// Errors reported for one row of an `insertAll` request
#[derive(Debug, Clone, Deserialize)]
pub struct RowInsertErrors {
    /// Position of the row in the request
    pub index: usize,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

impl RowInsertErrors {
    /// All error messages for the row, joined
    pub fn describe(&self) -> String {
        if self.errors.is_empty() {
            return "row rejected without a reason".to_string();
        }

        self.errors
            .iter()
            .map(|e| match (e.reason.is_empty(), e.message.is_empty()) {
                (false, false) => format!("{}: {}", e.reason, e.message),
                (false, true) => e.reason.clone(),
                _ => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}
