//! Named record streams backed by JSON files

use crate::config::schema::ResourceKind;
use crate::core::source::reader::read_json_array;
use crate::core::transform::flatten_order_items;
use crate::domain::errors::{LoaderError, SourceError};
use crate::domain::ids::ResourceName;
use crate::domain::records::{FlattenedPair, Record};
use crate::domain::Result;
use std::path::{Path, PathBuf};

/// Lazily evaluated sequence of records
///
/// Items are `Err` only for structural problems found while producing
/// records; the stream should not be polled after an `Err`.
pub type RecordStream = Box<dyn Iterator<Item = Result<Record>> + Send>;

/// A named data stream loaded into the table of the same name
pub trait Resource: Send + Sync {
    /// Resource (and table) name
    fn name(&self) -> &ResourceName;

    /// File the records come from
    fn path(&self) -> &Path;

    /// Open the resource and return its records
    ///
    /// Each call reads the file again, so every stream starts from the
    /// beginning.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the file is missing, unreadable, not
    /// valid JSON or not a JSON array.
    fn extract(&self) -> std::result::Result<RecordStream, SourceError>;
}

/// Every element of the file's top-level array, unchanged
#[derive(Debug, Clone)]
pub struct JsonFileResource {
    name: ResourceName,
    path: PathBuf,
}

impl JsonFileResource {
    /// Create a resource reading `path`
    pub fn new(name: ResourceName, path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            path: path.into(),
        }
    }
}

impl Resource for JsonFileResource {
    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> std::result::Result<RecordStream, SourceError> {
        let records = read_json_array(&self.path)?;
        Ok(Box::new(records.into_iter().map(Ok)))
    }
}

/// One `{"order": {...}, "item": {...}}` record per order line item
#[derive(Debug, Clone)]
pub struct OrderItemsResource {
    name: ResourceName,
    path: PathBuf,
}

impl OrderItemsResource {
    /// Create a resource flattening the orders in `path`
    pub fn new(name: ResourceName, path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            path: path.into(),
        }
    }
}

impl Resource for OrderItemsResource {
    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> std::result::Result<RecordStream, SourceError> {
        let orders = read_json_array(&self.path)?;
        Ok(Box::new(flatten_order_items(orders).map(|pair| {
            pair.map(FlattenedPair::into_record)
                .map_err(LoaderError::from)
        })))
    }
}

/// Build the resource implementation for a configured kind
pub fn create_resource(
    kind: ResourceKind,
    name: ResourceName,
    path: impl Into<PathBuf>,
) -> Box<dyn Resource> {
    match kind {
        ResourceKind::Records => Box::new(JsonFileResource::new(name, path)),
        ResourceKind::OrderItems => Box::new(OrderItemsResource::new(name, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RecordShapeError;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn name(value: &str) -> ResourceName {
        ResourceName::new(value).unwrap()
    }

    #[test]
    fn test_json_file_resource_yields_records_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("product_data.json");
        fs::write(&path, r#"[{"sku": "x", "price": 9.5}, "odd", null]"#).unwrap();

        let resource = JsonFileResource::new(name("raw_products"), &path);
        assert_eq!(resource.name().as_str(), "raw_products");
        assert_eq!(resource.path(), path.as_path());

        let records: Vec<Record> = resource
            .extract()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            records,
            vec![json!({"sku": "x", "price": 9.5}), json!("odd"), json!(null)]
        );
    }

    #[test]
    fn test_extract_can_be_called_again() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("customer_data.json");
        fs::write(&path, r#"[{"id": 1}, {"id": 2}]"#).unwrap();

        let resource = JsonFileResource::new(name("raw_customers"), &path);
        assert_eq!(resource.extract().unwrap().count(), 2);
        assert_eq!(resource.extract().unwrap().count(), 2);
    }

    #[test]
    fn test_order_items_resource_flattens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("order_data.json");
        fs::write(
            &path,
            r#"[
                {"order_id": "A1", "items": [{"sku": "x"}, {"sku": "y"}]},
                {"order_id": "A2", "items": []}
            ]"#,
        )
        .unwrap();

        let resource = OrderItemsResource::new(name("raw_orders"), &path);
        let records: Vec<Record> = resource
            .extract()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            records,
            vec![
                json!({"order": {"order_id": "A1"}, "item": {"sku": "x", "order_id": "A1"}}),
                json!({"order": {"order_id": "A1"}, "item": {"sku": "y", "order_id": "A1"}}),
            ]
        );
    }

    #[test]
    fn test_order_items_resource_structural_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("order_data.json");
        fs::write(&path, r#"[{"items": [{"sku": "x"}]}]"#).unwrap();

        let resource = OrderItemsResource::new(name("raw_orders"), &path);
        let results: Vec<Result<Record>> = resource.extract().unwrap().collect();

        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(LoaderError::RecordShape(RecordShapeError::MissingOrderId {
                order_index: 0
            }))
        ));
    }

    #[test]
    fn test_missing_file_fails_extract() {
        let dir = TempDir::new().unwrap();
        let resource = create_resource(
            ResourceKind::OrderItems,
            name("raw_orders"),
            dir.path().join("order_data.json"),
        );

        assert!(matches!(
            resource.extract(),
            Err(SourceError::NotFound { .. })
        ));
    }
}
