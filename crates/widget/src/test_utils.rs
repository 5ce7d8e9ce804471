use serde_json::{Value, json};

use crate::model::OrderRecord;

/// The order used across the widget tests. Every field value is distinct so
/// assertions on rendered output cannot pass by accident.
pub fn sample_order_json() -> Value {
    json!({
        "order_uid": "b563feb7b2b84b6test",
        "track_number": "WBILMTESTTRACK",
        "entry": "WBIL",
        "delivery": {
            "name": "Test Testov",
            "phone": "+9720000000",
            "zip": "2639809",
            "city": "Kiryat Mozkin",
            "address": "Ploshad Mira 15",
            "region": "Kraiot",
            "email": "test@gmail.com"
        },
        "payment": {
            "transaction": "b563feb7b2b84b6test",
            "request_id": "req-77",
            "currency": "USD",
            "provider": "wbpay",
            "amount": 1817,
            "payment_dt": 1_637_907_727,
            "bank": "alpha",
            "delivery_cost": 1500,
            "goods_total": 317,
            "custom_fee": 12
        },
        "items": [
            {
                "chrt_id": 9_934_930,
                "track_number": "WBILMTESTTRACK",
                "price": 453,
                "rid": "ab4219087a764ae0btest",
                "name": "Mascaras",
                "sale": 30,
                "size": "0",
                "total_price": 317,
                "nm_id": 2_389_212,
                "brand": "Vivienne Sabo",
                "status": 202
            }
        ],
        "locale": "en",
        "internal_signature": "sig-internal",
        "customer_id": "test-customer",
        "delivery_service": "meest",
        "shardkey": "9",
        "sm_id": 99,
        "date_created": "2021-11-26T06:22:19Z",
        "oof_shard": "1"
    })
}

pub fn sample_order() -> OrderRecord {
    serde_json::from_value(sample_order_json()).unwrap()
}
