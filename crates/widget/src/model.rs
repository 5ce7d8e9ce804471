use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Order document served by `GET /orders/{order_uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_uid: String,
    pub track_number: String,
    pub entry: String,
    pub delivery: Delivery,
    pub payment: Payment,
    /// `null` on the wire renders as an empty items section.
    pub items: Option<Vec<Item>>,
    pub locale: String,
    #[serde(default)]
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    pub shardkey: String,
    pub sm_id: i64,
    /// Kept exactly as the server sent it.
    pub date_created: String,
    #[serde(default)]
    pub oof_shard: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub zip: String,
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub transaction: String,
    #[serde(default)]
    pub request_id: String,
    pub currency: String,
    pub provider: String,
    pub amount: i64,
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i64,
    pub goods_total: i64,
    pub custom_fee: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub chrt_id: i64,
    #[serde(default)]
    pub track_number: String,
    pub price: i64,
    pub rid: String,
    #[serde(default)]
    pub name: String,
    pub sale: i64,
    #[serde(default)]
    pub size: String,
    pub total_price: i64,
    pub nm_id: i64,
    #[serde(default)]
    pub brand: String,
    pub status: i64,
}

/// Structured error body returned with any non-200 status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub msg: String,
}

impl ErrorPayload {
    pub fn new(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Number(i64::from(code)),
            msg: msg.into(),
        }
    }
}

/// Servers report the code either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(code) => write!(f, "{code}"),
            Self::Text(code) => write!(f, "{code}"),
        }
    }
}
