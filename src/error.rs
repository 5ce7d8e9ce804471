//! Domain-specific error types, one per concern: storage, order rules and
//! HTTP responses.

use orders_widget::ErrorPayload;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;

use crate::service::OrderServiceError;

/// Database persistence and stored-data errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Order with uid {0} already exists")]
    OrderExistsUuid(String),
    #[error("Order with track number {0} already exists")]
    OrderExistsTrack(String),
    #[error("Payment with transaction {0} already exists")]
    PaymentExists(String),
    #[error("Order with uid {0} not found")]
    OrderNotFound(String),
    #[error("Corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },
}

/// Order document rule violations found before anything is stored.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field {field} is not a valid uuid: {value}")]
    InvalidUuid { field: &'static str, value: String },
    #[error("Field {field} is not an RFC 3339 timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("Field {field} must be {rule} but was {value}")]
    OutOfRange {
        field: &'static str,
        rule: &'static str,
        value: i64,
    },
}

/// HTTP error response carrying an `ErrorPayload` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: Status,
    pub payload: ErrorPayload,
}

impl From<&OrderServiceError> for ApiError {
    fn from(err: &OrderServiceError) -> Self {
        Self {
            status: Status::from_code(err.status_code()).unwrap_or(Status::InternalServerError),
            payload: err.error_payload(),
        }
    }
}

impl From<OrderServiceError> for ApiError {
    fn from(err: OrderServiceError) -> Self {
        Self::from(&err)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (self.status, Json(self.payload)).respond_to(request)
    }
}
