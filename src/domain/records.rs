//! Record types flowing from sources to destinations

use crate::domain::ids::LoadId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single record produced by a resource
pub type Record = Value;

/// One order line item paired with the order it belongs to
///
/// `order` never contains an `items` field; `item` always carries the
/// parent's `order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedPair {
    /// The order with its `items` field removed
    pub order: Map<String, Value>,

    /// The line item with `order_id` added
    pub item: Map<String, Value>,
}

impl FlattenedPair {
    /// Convert into the `{"order": {...}, "item": {...}}` record shape
    pub fn into_record(self) -> Record {
        let mut record = Map::with_capacity(2);
        record.insert("order".to_string(), Value::Object(self.order));
        record.insert("item".to_string(), Value::Object(self.item));
        Value::Object(record)
    }
}

/// Envelope row written to every destination table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRow {
    /// Unique id of this row, also used as the BigQuery insert id
    pub record_id: Uuid,

    /// Pipeline run that wrote the row
    pub load_id: LoadId,

    /// 0-based position of the record within its resource stream
    pub record_index: u64,

    /// SHA-256 of the canonical record JSON
    pub record_hash: String,

    /// The record itself
    pub data: Record,

    /// Start time of the pipeline run
    pub loaded_at: DateTime<Utc>,
}

/// Name of a JSON value's type, for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flattened_pair_into_record() {
        let pair = FlattenedPair {
            order: json!({"order_id": "A1"}).as_object().unwrap().clone(),
            item: json!({"sku": "x", "order_id": "A1"})
                .as_object()
                .unwrap()
                .clone(),
        };

        let record = pair.into_record();
        assert_eq!(
            record,
            json!({
                "order": {"order_id": "A1"},
                "item": {"sku": "x", "order_id": "A1"}
            })
        );
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(1.5)), "number");
        assert_eq!(json_type_name(&json!("a")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
