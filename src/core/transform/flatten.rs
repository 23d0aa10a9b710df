//! Order line-item flattening
//!
//! Turns a sequence of orders, each embedding its line items under `items`,
//! into a flat sequence of `(order, item)` pairs: one pair per line item, in
//! input order, with the parent's `order_id` copied onto every item.
//!
//! ```text
//! {"order_id": "A1", "items": [{"sku": "x"}, {"sku": "y"}]}
//!   -> {"order": {"order_id": "A1"}, "item": {"sku": "x", "order_id": "A1"}}
//!   -> {"order": {"order_id": "A1"}, "item": {"sku": "y", "order_id": "A1"}}
//! ```

use crate::domain::errors::RecordShapeError;
use crate::domain::records::{json_type_name, FlattenedPair};
use serde_json::{Map, Value};
use std::iter::Enumerate;
use std::vec;

const ITEMS_FIELD: &str = "items";
const ORDER_ID_FIELD: &str = "order_id";

/// Flatten orders into `(order, item)` pairs lazily
///
/// Orders are pulled from `orders` only as pairs are requested. An order
/// without an `items` field, or with `items: []`, contributes no pairs and
/// does not need an `order_id`.
///
/// The iterator stops after yielding the first [`RecordShapeError`].
///
/// # Examples
///
/// ```
/// use shoploader::core::transform::flatten::flatten_order_items;
/// use serde_json::json;
///
/// let orders = vec![
///     json!({"order_id": "A1", "items": [{"sku": "x"}, {"sku": "y"}]}),
///     json!({"order_id": "A2", "items": []}),
/// ];
///
/// let pairs: Vec<_> = flatten_order_items(orders)
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[1].item["sku"], "y");
/// assert_eq!(pairs[1].item["order_id"], "A1");
/// assert!(!pairs[1].order.contains_key("items"));
/// ```
pub fn flatten_order_items<I>(orders: I) -> OrderItems<I::IntoIter>
where
    I: IntoIterator<Item = Value>,
{
    OrderItems {
        orders: orders.into_iter().enumerate(),
        current: None,
        done: false,
    }
}

/// Iterator returned by [`flatten_order_items`]
pub struct OrderItems<I> {
    orders: Enumerate<I>,
    current: Option<OpenOrder>,
    done: bool,
}

/// The order whose items are currently being emitted
struct OpenOrder {
    order_index: usize,
    order: Map<String, Value>,
    order_id: Value,
    items: Enumerate<vec::IntoIter<Value>>,
}

impl<I> Iterator for OrderItems<I>
where
    I: Iterator<Item = Value>,
{
    type Item = Result<FlattenedPair, RecordShapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(open) = self.current.as_mut() {
                if let Some((item_index, item)) = open.items.next() {
                    return Some(match item {
                        Value::Object(mut item) => {
                            item.insert(ORDER_ID_FIELD.to_string(), open.order_id.clone());
                            Ok(FlattenedPair {
                                order: open.order.clone(),
                                item,
                            })
                        }
                        other => {
                            self.done = true;
                            Err(RecordShapeError::ItemNotObject {
                                order_index: open.order_index,
                                item_index,
                                found: json_type_name(&other),
                            })
                        }
                    });
                }
                self.current = None;
            }

            let (order_index, order) = self.orders.next()?;
            match open_order(order_index, order) {
                Ok(Some(open)) => self.current = Some(open),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Detach the items from an order
///
/// Returns `None` when the order has nothing to emit.
fn open_order(order_index: usize, order: Value) -> Result<Option<OpenOrder>, RecordShapeError> {
    let mut order = match order {
        Value::Object(map) => map,
        other => {
            return Err(RecordShapeError::OrderNotObject {
                order_index,
                found: json_type_name(&other),
            })
        }
    };

    let items = match order.remove(ITEMS_FIELD) {
        None => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(RecordShapeError::ItemsNotArray {
                order_index,
                found: json_type_name(&other),
            })
        }
    };

    if items.is_empty() {
        return Ok(None);
    }

    let order_id = order
        .get(ORDER_ID_FIELD)
        .cloned()
        .ok_or(RecordShapeError::MissingOrderId { order_index })?;

    Ok(Some(OpenOrder {
        order_index,
        order,
        order_id,
        items: items.into_iter().enumerate(),
    }))
}
