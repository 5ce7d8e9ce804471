use orders_widget::OrderRecord;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{trace, warn};
use uuid::Uuid;

/// Thread-safe in-memory copy of stored orders, keyed by order uid.
///
/// Entries are never evicted: orders are immutable once stored.
#[derive(Debug, Default)]
pub struct OrderCache {
    orders: RwLock<HashMap<Uuid, OrderRecord>>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, order_uid: &Uuid) -> Option<OrderRecord> {
        let order = self.orders.read().await.get(order_uid).cloned();
        trace!(
            "Cache {} for order {order_uid}",
            if order.is_some() { "hit" } else { "miss" }
        );
        order
    }

    pub async fn set(&self, order_uid: Uuid, order: OrderRecord) {
        self.orders.write().await.insert(order_uid, order);
    }

    /// Orders whose uid is not a uuid are skipped.
    pub async fn set_all(&self, orders: Vec<OrderRecord>) {
        let mut guard = self.orders.write().await;
        for order in orders {
            match Uuid::parse_str(&order.order_uid) {
                Ok(order_uid) => {
                    guard.insert(order_uid, order);
                }
                Err(e) => warn!("Skipping order {} in cache warm-up: {e}", order.order_uid),
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}
