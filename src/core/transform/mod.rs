//! Data transformation logic
//!
//! - [`flatten`] - one `(order, item)` pair per order line item

pub mod flatten;

pub use flatten::{flatten_order_items, OrderItems};
