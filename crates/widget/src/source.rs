use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderValue};
use tracing::debug;

use crate::error::LookupError;
use crate::model::{ErrorPayload, OrderRecord};

/// A decoded answer from the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResponse {
    /// Status 200 with an order body.
    Found(Box<OrderRecord>),
    /// Any other status with an error body.
    Rejected { status: u16, error: ErrorPayload },
}

/// Where the widget gets orders from.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch(&self, order_id: &str) -> Result<LookupResponse, LookupError>;
}

/// Fetches orders from `GET {base_url}/orders/{order_id}`.
#[derive(Debug, Clone)]
pub struct HttpOrderSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpOrderSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The identifier is percent-encoded as a single path segment.
    pub fn order_url(&self, order_id: &str) -> String {
        format!(
            "{}/orders/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(order_id)
        )
    }
}

#[async_trait]
impl OrderSource for HttpOrderSource {
    async fn fetch(&self, order_id: &str) -> Result<LookupResponse, LookupError> {
        let url = self.order_url(order_id);
        debug!("Requesting order from {url}");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::OK {
            let order: OrderRecord =
                serde_json::from_str(&body).map_err(|source| LookupError::MalformedOrder {
                    status: status.as_u16(),
                    source,
                })?;
            return Ok(LookupResponse::Found(Box::new(order)));
        }

        let error: ErrorPayload =
            serde_json::from_str(&body).map_err(|source| LookupError::MalformedError {
                status: status.as_u16(),
                source,
            })?;

        Ok(LookupResponse::Rejected {
            status: status.as_u16(),
            error,
        })
    }
}
