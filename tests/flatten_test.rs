//! Property-style tests for order line-item flattening
//!
//! Orders are generated with `fake` so every run exercises different shapes:
//! orders with and without line items, numeric and string ids, and items
//! carrying arbitrary extra fields.

use fake::faker::lorem::en::Word;
use fake::{Fake, Faker};
use serde_json::{json, Map, Value};
use shoploader::core::transform::flatten_order_items;
use shoploader::domain::FlattenedPair;

fn fake_item() -> Value {
    let mut item = Map::new();
    item.insert("sku".to_string(), Value::from(Word().fake::<String>()));
    item.insert("quantity".to_string(), Value::from((1..10u32).fake::<u32>()));
    item.insert("price".to_string(), json!((1..50_000u32).fake::<u32>() as f64 / 100.0));
    if Faker.fake::<bool>() {
        item.insert("title".to_string(), Value::from(Word().fake::<String>()));
    }
    Value::Object(item)
}

fn fake_order(index: usize) -> Value {
    let order_id = if Faker.fake::<bool>() {
        Value::from(format!("ORD-{index:05}"))
    } else {
        Value::from(1_000 + index as u64)
    };

    let item_count = (0..5usize).fake::<usize>();
    let mut order = Map::new();
    order.insert("order_id".to_string(), order_id);
    order.insert("customer_id".to_string(), Value::from(Word().fake::<String>()));
    order.insert("total_price".to_string(), json!((0..100_000u32).fake::<u32>() as f64 / 100.0));
    order.insert(
        "items".to_string(),
        Value::Array((0..item_count).map(|_| fake_item()).collect()),
    );
    Value::Object(order)
}

fn fake_orders() -> Vec<Value> {
    let count = (0..40usize).fake::<usize>();
    (0..count).map(fake_order).collect()
}

fn flatten(orders: Vec<Value>) -> Vec<FlattenedPair> {
    flatten_order_items(orders)
        .collect::<Result<Vec<_>, _>>()
        .expect("generated orders are well formed")
}

#[test]
fn test_pair_count_matches_total_items() {
    for _ in 0..50 {
        let orders = fake_orders();
        let expected: usize = orders
            .iter()
            .map(|order| order["items"].as_array().map_or(0, Vec::len))
            .sum();

        assert_eq!(flatten(orders).len(), expected);
    }
}

#[test]
fn test_every_item_carries_its_order_id() {
    for _ in 0..50 {
        for pair in flatten(fake_orders()) {
            assert_eq!(pair.item.get("order_id"), pair.order.get("order_id"));
        }
    }
}

#[test]
fn test_orders_lose_only_their_items() {
    for _ in 0..50 {
        let orders = fake_orders();
        let pairs = flatten(orders.clone());

        for pair in &pairs {
            assert!(!pair.order.contains_key("items"));

            let source = orders
                .iter()
                .find(|order| order.get("order_id") == pair.order.get("order_id"))
                .expect("pair order comes from the input");
            let mut expected = source.as_object().unwrap().clone();
            expected.remove("items");
            assert_eq!(pair.order, expected);
        }
    }
}

#[test]
fn test_pairs_follow_input_order() {
    for _ in 0..50 {
        let orders = fake_orders();

        let expected: Vec<Value> = orders
            .iter()
            .flat_map(|order| {
                let order_id = order["order_id"].clone();
                order["items"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |mut item| {
                        item["order_id"] = order_id.clone();
                        item
                    })
            })
            .collect();

        let actual: Vec<Value> = flatten(orders)
            .into_iter()
            .map(|pair| Value::Object(pair.item))
            .collect();

        assert_eq!(actual, expected);
    }
}

#[test]
fn test_two_orders_one_without_items() {
    let orders = vec![
        json!({"order_id": "A1", "items": [{"sku": "x"}, {"sku": "y"}]}),
        json!({"order_id": "A2", "items": []}),
    ];

    let records: Vec<Value> = flatten(orders)
        .into_iter()
        .map(FlattenedPair::into_record)
        .collect();

    assert_eq!(
        records,
        vec![
            json!({"order": {"order_id": "A1"}, "item": {"sku": "x", "order_id": "A1"}}),
            json!({"order": {"order_id": "A1"}, "item": {"sku": "y", "order_id": "A1"}}),
        ]
    );
}

#[test]
fn test_shared_order_is_not_aliased() {
    let orders = vec![json!({
        "order_id": "A1",
        "note": "gift",
        "items": [{"sku": "x"}, {"sku": "y"}]
    })];

    let mut pairs = flatten(orders);
    pairs[0].order.insert("note".to_string(), json!("changed"));

    assert_eq!(pairs[1].order["note"], "gift");
}
