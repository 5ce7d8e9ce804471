use orders_widget::{Delivery, Item, OrderRecord, Payment};
use sqlx::SqlitePool;

pub const TEST_ORDER_UID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
pub const TEST_TRANSACTION: &str = "0b5a1c2d-3e4f-4a5b-8c6d-7e8f9a0b1c2d";

/// Centralized test database setup: in-memory SQLite with all migrations
/// applied.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

pub fn sample_order() -> OrderRecord {
    OrderRecord {
        order_uid: TEST_ORDER_UID.to_string(),
        track_number: "WBILMTESTTRACK".to_string(),
        entry: "WBIL".to_string(),
        delivery: Delivery {
            name: "Test Testov".to_string(),
            phone: "+9720000000".to_string(),
            zip: "2639809".to_string(),
            city: "Kiryat Mozkin".to_string(),
            address: "Ploshad Mira 15".to_string(),
            region: "Kraiot".to_string(),
            email: "test@gmail.com".to_string(),
        },
        payment: Payment {
            transaction: TEST_TRANSACTION.to_string(),
            request_id: String::new(),
            currency: "USD".to_string(),
            provider: "wbpay".to_string(),
            amount: 1817,
            payment_dt: 1_637_907_727,
            bank: "alpha".to_string(),
            delivery_cost: 1500,
            goods_total: 317,
            custom_fee: 0,
        },
        items: Some(vec![Item {
            chrt_id: 9_934_930,
            track_number: "WBILMTESTTRACK".to_string(),
            price: 453,
            rid: "ab4219087a764ae0btest".to_string(),
            name: "Mascaras".to_string(),
            sale: 30,
            size: "0".to_string(),
            total_price: 317,
            nm_id: 2_389_212,
            brand: "Vivienne Sabo".to_string(),
            status: 202,
        }]),
        locale: "en".to_string(),
        internal_signature: String::new(),
        customer_id: "test".to_string(),
        delivery_service: "meest".to_string(),
        shardkey: "9".to_string(),
        sm_id: 99,
        date_created: "2021-11-26T06:22:19Z".to_string(),
        oof_shard: "1".to_string(),
    }
}

/// A second order with every unique key changed.
pub fn other_order(order_uid: &str, transaction: &str, track_number: &str) -> OrderRecord {
    let mut order = sample_order();
    order.order_uid = order_uid.to_string();
    order.payment.transaction = transaction.to_string();
    order.track_number = track_number.to_string();
    for item in order.items.iter_mut().flatten() {
        item.track_number = track_number.to_string();
    }
    order
}
