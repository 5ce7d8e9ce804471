use chrono::{DateTime, NaiveDateTime, Utc};
use orders_widget::OrderRecord;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::service::OrderService;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Queue entry {0} not found")]
    EntryNotFound(i64),
}

/// Raw order document waiting in the ingestion queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedOrder {
    pub id: i64,
    pub payload: String,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl QueuedOrder {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let created_at: NaiveDateTime = row.try_get("created_at")?;
        let processed_at: Option<NaiveDateTime> = row.try_get("processed_at")?;

        Ok(Self {
            id: row.try_get("id")?,
            payload: row.try_get("payload")?,
            processed: row.try_get("processed")?,
            created_at: created_at.and_utc(),
            processed_at: processed_at.map(|dt| dt.and_utc()),
        })
    }
}

/// What happened to the entry taken off the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Empty,
    Stored { id: i64, order_uid: Uuid },
    Rejected { id: i64, reason: String },
}

pub async fn enqueue(pool: &SqlitePool, payload: &str) -> Result<i64, QueueError> {
    let row = sqlx::query("INSERT INTO order_queue (payload, processed) VALUES (?, 0) RETURNING id")
        .bind(payload)
        .fetch_one(pool)
        .await?;

    Ok(row.try_get("id")?)
}

/// Oldest unprocessed entry, in insertion order.
pub async fn next_unprocessed(pool: &SqlitePool) -> Result<Option<QueuedOrder>, QueueError> {
    let row = sqlx::query(
        r#"
        SELECT id, payload, processed, created_at, processed_at
        FROM order_queue
        WHERE processed = 0
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(QueuedOrder::from_row).transpose()?)
}

pub async fn mark_processed(pool: &SqlitePool, id: i64) -> Result<(), QueueError> {
    let result = sqlx::query(
        "UPDATE order_queue SET processed = 1, processed_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(QueueError::EntryNotFound(id));
    }
    Ok(())
}

pub async fn count_unprocessed(pool: &SqlitePool) -> Result<i64, QueueError> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM order_queue WHERE processed = 0")
        .fetch_one(pool)
        .await?;

    Ok(row.try_get("count")?)
}

/// Takes the next entry off the queue and stores it through the service.
/// The entry is marked processed whether or not the order was accepted, so
/// a bad document is never retried.
pub async fn process_next(
    pool: &SqlitePool,
    service: &OrderService,
) -> Result<ProcessOutcome, QueueError> {
    let Some(entry) = next_unprocessed(pool).await? else {
        return Ok(ProcessOutcome::Empty);
    };

    let outcome = match serde_json::from_str::<OrderRecord>(&entry.payload) {
        Err(e) => {
            warn!("Queue entry {} is not an order document: {e}", entry.id);
            ProcessOutcome::Rejected {
                id: entry.id,
                reason: format!("undecodable order document: {e}"),
            }
        }
        Ok(order) => match service.set_order(order).await {
            Ok(order_uid) => {
                info!("Queue entry {} stored as order {order_uid}", entry.id);
                ProcessOutcome::Stored {
                    id: entry.id,
                    order_uid,
                }
            }
            Err(e) => {
                warn!("Queue entry {} rejected: {e}", entry.id);
                ProcessOutcome::Rejected {
                    id: entry.id,
                    reason: e.to_string(),
                }
            }
        },
    };

    mark_processed(pool, entry.id).await?;
    Ok(outcome)
}

/// Drains the queue forever.
pub async fn run_processor(pool: SqlitePool, service: &OrderService) {
    info!("Starting order queue processor");

    match count_unprocessed(&pool).await {
        Ok(0) => info!("No queued orders waiting"),
        Ok(count) => info!("Found {count} queued orders from previous sessions"),
        Err(e) => error!("Failed to count queued orders: {e}"),
    }

    loop {
        match process_next(&pool, service).await {
            Ok(ProcessOutcome::Empty) => sleep(Duration::from_millis(100)).await,
            Ok(_) => {}
            Err(e) => {
                error!("Error processing queued order: {e}");
                sleep(Duration::from_millis(500)).await;
            }
        }
    }
}
