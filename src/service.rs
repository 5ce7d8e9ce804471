use async_trait::async_trait;
use orders_widget::{ErrorPayload, LookupError, LookupResponse, OrderRecord, OrderSource};
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::cache::OrderCache;
use crate::error::{PersistenceError, ValidationError};
use crate::repository::OrderRepository;
use crate::validation::validate_order;

#[derive(Debug, thiserror::Error)]
pub enum OrderServiceError {
    #[error("Invalid order uid: {0}")]
    InvalidUuid(String),
    #[error("Order validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl OrderServiceError {
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidUuid(_)
            | Self::Validation(_)
            | Self::Persistence(
                PersistenceError::OrderExistsUuid(_)
                | PersistenceError::OrderExistsTrack(_)
                | PersistenceError::PaymentExists(_),
            ) => 400,
            Self::Persistence(PersistenceError::OrderNotFound(_)) => 404,
            Self::Persistence(_) => 500,
        }
    }

    /// The body clients see. Storage failures are not described to them.
    pub fn error_payload(&self) -> ErrorPayload {
        let code = self.status_code();
        match self {
            Self::InvalidUuid(_) => ErrorPayload::new(code, "invalid uuid format"),
            Self::Persistence(PersistenceError::OrderNotFound(_)) => {
                ErrorPayload::new(code, "order not found")
            }
            Self::Validation(_)
            | Self::Persistence(
                PersistenceError::OrderExistsUuid(_)
                | PersistenceError::OrderExistsTrack(_)
                | PersistenceError::PaymentExists(_),
            ) => ErrorPayload::new(code, self.to_string()),
            Self::Persistence(_) => {
                ErrorPayload::new(code, "internal server error while executing request")
            }
        }
    }
}

/// Order lookups through the cache with the database behind it, plus
/// validated inserts.
#[derive(Debug)]
pub struct OrderService {
    repository: OrderRepository,
    cache: OrderCache,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: OrderRepository::new(pool),
            cache: OrderCache::new(),
        }
    }

    pub fn cache(&self) -> &OrderCache {
        &self.cache
    }

    pub async fn get_order_by_uid(&self, order_uid: &str) -> Result<OrderRecord, OrderServiceError> {
        let uid = Uuid::parse_str(order_uid)
            .map_err(|_| OrderServiceError::InvalidUuid(order_uid.to_string()))?;

        if let Some(order) = self.cache.get(&uid).await {
            return Ok(order);
        }

        let order = self.repository.get_order_by_uid(&uid).await?;
        self.cache.set(uid, order.clone()).await;
        debug!("Loaded order {uid} from database into cache");
        Ok(order)
    }

    /// Validates and stores the order. The stored uid is the canonical
    /// lowercase hyphenated form. The cache is filled lazily on lookup.
    pub async fn set_order(&self, mut order: OrderRecord) -> Result<Uuid, OrderServiceError> {
        let uid = validate_order(&order)?;
        order.order_uid = uid.to_string();

        self.repository.insert_order(&order).await?;
        info!("Stored order {uid}");
        Ok(uid)
    }

    /// Loads every stored order into the cache. Returns how many were
    /// loaded; on failure the cache is left as it was.
    pub async fn recover(&self) -> usize {
        match self.repository.get_all_orders().await {
            Ok(orders) => {
                self.cache.set_all(orders).await;
                let count = self.cache.len().await;
                info!("Recovered {count} orders into cache");
                count
            }
            Err(e) => {
                warn!("Failed to recover orders into cache: {e}");
                0
            }
        }
    }
}

#[async_trait]
impl OrderSource for OrderService {
    async fn fetch(&self, order_id: &str) -> Result<LookupResponse, LookupError> {
        match self.get_order_by_uid(order_id).await {
            Ok(order) => Ok(LookupResponse::Found(Box::new(order))),
            Err(err) => {
                let status = err.status_code();
                if status >= 500 {
                    error!("Order lookup for {order_id} failed: {err}");
                }
                Ok(LookupResponse::Rejected {
                    status,
                    error: err.error_payload(),
                })
            }
        }
    }
}
