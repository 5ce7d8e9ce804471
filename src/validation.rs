use chrono::DateTime;
use orders_widget::{Item, OrderRecord};
use uuid::Uuid;

use crate::error::ValidationError;

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn uuid(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| ValidationError::InvalidUuid {
        field,
        value: value.to_string(),
    })
}

fn timestamp(field: &'static str, value: &str) -> Result<(), ValidationError> {
    DateTime::parse_from_rfc3339(value).map_err(|_| ValidationError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })?;
    Ok(())
}

fn at_least(field: &'static str, value: i64, min: i64) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::OutOfRange {
            field,
            rule: if min == 0 { ">= 0" } else { "> 0" },
            value,
        });
    }
    Ok(())
}

fn validate_item(item: &Item) -> Result<(), ValidationError> {
    if item.chrt_id == 0 {
        return Err(ValidationError::MissingField("items.chrt_id"));
    }
    required("items.track_number", &item.track_number)?;
    required("items.rid", &item.rid)?;
    required("items.name", &item.name)?;
    at_least("items.price", item.price, 0)?;
    if !(0..=100).contains(&item.sale) {
        return Err(ValidationError::OutOfRange {
            field: "items.sale",
            rule: "between 0 and 100",
            value: item.sale,
        });
    }
    at_least("items.total_price", item.total_price, 0)?;
    at_least("items.nm_id", item.nm_id, 0)?;
    at_least("items.status", item.status, 1)?;
    Ok(())
}

/// Checks an incoming order document and returns its parsed uid.
pub fn validate_order(order: &OrderRecord) -> Result<Uuid, ValidationError> {
    let order_uid = uuid("order_uid", &order.order_uid)?;
    required("track_number", &order.track_number)?;
    required("entry", &order.entry)?;
    required("locale", &order.locale)?;
    required("customer_id", &order.customer_id)?;
    required("delivery_service", &order.delivery_service)?;
    required("shardkey", &order.shardkey)?;
    at_least("sm_id", order.sm_id, 0)?;
    timestamp("date_created", &order.date_created)?;

    let delivery = &order.delivery;
    required("delivery.name", &delivery.name)?;
    required("delivery.phone", &delivery.phone)?;
    required("delivery.city", &delivery.city)?;

    let payment = &order.payment;
    uuid("payment.transaction", &payment.transaction)?;
    required("payment.currency", &payment.currency)?;
    required("payment.provider", &payment.provider)?;
    required("payment.bank", &payment.bank)?;
    at_least("payment.amount", payment.amount, 0)?;
    at_least("payment.payment_dt", payment.payment_dt, 1)?;
    at_least("payment.delivery_cost", payment.delivery_cost, 0)?;
    at_least("payment.goods_total", payment.goods_total, 0)?;
    at_least("payment.custom_fee", payment.custom_fee, 0)?;

    let items = order
        .items
        .as_ref()
        .ok_or(ValidationError::MissingField("items"))?;
    for item in items {
        validate_item(item)?;
    }

    Ok(order_uid)
}
