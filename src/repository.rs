use orders_widget::{Delivery, Item, OrderRecord, Payment};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::PersistenceError;

const ORDER_COLUMNS: &str = "order_uid, track_number, entry, delivery_id, payment_id, locale, \
     internal_signature, customer_id, delivery_service, shardkey, sm_id, date_created, oof_shard";

/// SQLite storage for orders. An order spans four tables: `orders`,
/// `delivery`, `payment` and `item` (items reference their order by uid).
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.message().to_string())
        }
        _ => None,
    }
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores the whole order in one transaction; nothing is written if any
    /// part fails.
    pub async fn insert_order(&self, order: &OrderRecord) -> Result<(), PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT 1 FROM orders WHERE order_uid = ?")
            .bind(&order.order_uid)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(PersistenceError::OrderExistsUuid(order.order_uid.clone()));
        }

        let delivery_id = insert_delivery(&mut tx, &order.delivery).await?;
        let payment_id = insert_payment(&mut tx, &order.payment).await?;
        insert_order_row(&mut tx, order, delivery_id, payment_id).await?;
        for item in order.items.iter().flatten() {
            insert_item(&mut tx, &order.order_uid, item).await?;
        }

        tx.commit().await?;
        debug!("Stored order {}", order.order_uid);
        Ok(())
    }

    pub async fn get_order_by_uid(&self, order_uid: &Uuid) -> Result<OrderRecord, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_uid = ?");
        let row = sqlx::query(&sql)
            .bind(order_uid.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| PersistenceError::OrderNotFound(order_uid.to_string()))?;

        let order = load_order(&mut tx, &row).await?;
        tx.commit().await?;
        Ok(order)
    }

    pub async fn get_all_orders(&self) -> Result<Vec<OrderRecord>, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY rowid ASC");
        let rows = sqlx::query(&sql).fetch_all(&mut *tx).await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(load_order(&mut tx, row).await?);
        }

        tx.commit().await?;
        Ok(orders)
    }
}

async fn insert_delivery(
    conn: &mut SqliteConnection,
    delivery: &Delivery,
) -> Result<i64, PersistenceError> {
    let row = sqlx::query(
        r#"
        INSERT INTO delivery (name, phone, zip, city, address, region, email)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING delivery_id
        "#,
    )
    .bind(&delivery.name)
    .bind(&delivery.phone)
    .bind(&delivery.zip)
    .bind(&delivery.city)
    .bind(&delivery.address)
    .bind(&delivery.region)
    .bind(&delivery.email)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.try_get("delivery_id")?)
}

async fn insert_payment(
    conn: &mut SqliteConnection,
    payment: &Payment,
) -> Result<i64, PersistenceError> {
    let row = sqlx::query(
        r#"
        INSERT INTO payment (
            transaction_id, request_id, currency, provider, amount, payment_dt,
            bank, delivery_cost, goods_total, custom_fee
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING payment_id
        "#,
    )
    .bind(&payment.transaction)
    .bind(&payment.request_id)
    .bind(&payment.currency)
    .bind(&payment.provider)
    .bind(payment.amount)
    .bind(payment.payment_dt)
    .bind(&payment.bank)
    .bind(payment.delivery_cost)
    .bind(payment.goods_total)
    .bind(payment.custom_fee)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some(_) => PersistenceError::PaymentExists(payment.transaction.clone()),
        None => PersistenceError::Database(e),
    })?;

    Ok(row.try_get("payment_id")?)
}

async fn insert_order_row(
    conn: &mut SqliteConnection,
    order: &OrderRecord,
    delivery_id: i64,
    payment_id: i64,
) -> Result<(), PersistenceError> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            order_uid, track_number, entry, delivery_id, payment_id, locale,
            internal_signature, customer_id, delivery_service, shardkey, sm_id,
            date_created, oof_shard
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&order.order_uid)
    .bind(&order.track_number)
    .bind(&order.entry)
    .bind(delivery_id)
    .bind(payment_id)
    .bind(&order.locale)
    .bind(&order.internal_signature)
    .bind(&order.customer_id)
    .bind(&order.delivery_service)
    .bind(&order.shardkey)
    .bind(order.sm_id)
    .bind(&order.date_created)
    .bind(&order.oof_shard)
    .execute(&mut *conn)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some(message) if message.contains("orders.track_number") => {
            PersistenceError::OrderExistsTrack(order.track_number.clone())
        }
        Some(_) => PersistenceError::OrderExistsUuid(order.order_uid.clone()),
        None => PersistenceError::Database(e),
    })?;

    Ok(())
}

async fn insert_item(
    conn: &mut SqliteConnection,
    order_uid: &str,
    item: &Item,
) -> Result<(), PersistenceError> {
    sqlx::query(
        r#"
        INSERT INTO item (
            order_uid, chrt_id, track_number, price, rid, name, sale, size,
            total_price, nm_id, brand, status
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(order_uid)
    .bind(item.chrt_id)
    .bind(&item.track_number)
    .bind(item.price)
    .bind(&item.rid)
    .bind(&item.name)
    .bind(item.sale)
    .bind(&item.size)
    .bind(item.total_price)
    .bind(item.nm_id)
    .bind(&item.brand)
    .bind(item.status)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn load_order(
    conn: &mut SqliteConnection,
    row: &SqliteRow,
) -> Result<OrderRecord, PersistenceError> {
    let delivery_id: i64 = row.try_get("delivery_id")?;
    let payment_id: i64 = row.try_get("payment_id")?;
    let order_uid: String = row.try_get("order_uid")?;

    let delivery = get_delivery(conn, delivery_id).await?;
    let payment = get_payment(conn, payment_id).await?;
    let items = get_items(conn, &order_uid).await?;

    Ok(OrderRecord {
        order_uid,
        track_number: row.try_get("track_number")?,
        entry: row.try_get("entry")?,
        delivery,
        payment,
        items: Some(items),
        locale: row.try_get("locale")?,
        internal_signature: row.try_get("internal_signature")?,
        customer_id: row.try_get("customer_id")?,
        delivery_service: row.try_get("delivery_service")?,
        shardkey: row.try_get("shardkey")?,
        sm_id: row.try_get("sm_id")?,
        date_created: row.try_get("date_created")?,
        oof_shard: row.try_get("oof_shard")?,
    })
}

async fn get_delivery(
    conn: &mut SqliteConnection,
    delivery_id: i64,
) -> Result<Delivery, PersistenceError> {
    let row = sqlx::query(
        "SELECT name, phone, zip, city, address, region, email FROM delivery WHERE delivery_id = ?",
    )
    .bind(delivery_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| PersistenceError::Corrupt {
        table: "delivery",
        reason: format!("missing delivery {delivery_id}"),
    })?;

    Ok(Delivery {
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        zip: row.try_get("zip")?,
        city: row.try_get("city")?,
        address: row.try_get("address")?,
        region: row.try_get("region")?,
        email: row.try_get("email")?,
    })
}

async fn get_payment(
    conn: &mut SqliteConnection,
    payment_id: i64,
) -> Result<Payment, PersistenceError> {
    let row = sqlx::query(
        r#"
        SELECT transaction_id, request_id, currency, provider, amount, payment_dt,
               bank, delivery_cost, goods_total, custom_fee
        FROM payment
        WHERE payment_id = ?
        "#,
    )
    .bind(payment_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| PersistenceError::Corrupt {
        table: "payment",
        reason: format!("missing payment {payment_id}"),
    })?;

    Ok(Payment {
        transaction: row.try_get("transaction_id")?,
        request_id: row.try_get("request_id")?,
        currency: row.try_get("currency")?,
        provider: row.try_get("provider")?,
        amount: row.try_get("amount")?,
        payment_dt: row.try_get("payment_dt")?,
        bank: row.try_get("bank")?,
        delivery_cost: row.try_get("delivery_cost")?,
        goods_total: row.try_get("goods_total")?,
        custom_fee: row.try_get("custom_fee")?,
    })
}

async fn get_items(
    conn: &mut SqliteConnection,
    order_uid: &str,
) -> Result<Vec<Item>, PersistenceError> {
    let rows = sqlx::query(
        r#"
        SELECT chrt_id, track_number, price, rid, name, sale, size, total_price,
               nm_id, brand, status
        FROM item
        WHERE order_uid = ?
        ORDER BY item_id ASC
        "#,
    )
    .bind(order_uid)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(Item {
                chrt_id: row.try_get("chrt_id")?,
                track_number: row.try_get("track_number")?,
                price: row.try_get("price")?,
                rid: row.try_get("rid")?,
                name: row.try_get("name")?,
                sale: row.try_get("sale")?,
                size: row.try_get("size")?,
                total_price: row.try_get("total_price")?,
                nm_id: row.try_get("nm_id")?,
                brand: row.try_get("brand")?,
                status: row.try_get("status")?,
            })
        })
        .collect()
}
