use chrono::{DateTime, Utc};
use orders_widget::{HtmlContainer, OrderLookupWidget, OrderRecord, TextInput, render};
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Route, State, get, routes};
use std::sync::Arc;
use tracing::error;

use crate::error::ApiError;
use crate::service::OrderService;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

#[get("/orders/<order_uid>")]
pub async fn get_order(
    order_uid: &str,
    service: &State<Arc<OrderService>>,
) -> Result<Json<OrderRecord>, ApiError> {
    service.get_order_by_uid(order_uid).await.map(Json).map_err(|e| {
        let api_error = ApiError::from(&e);
        if api_error.status.code >= 500 {
            error!("Failed to get order {order_uid}: {e}");
        }
        api_error
    })
}

/// Lookup page. With `order_id` set the widget runs against the in-process
/// service and its result container is rendered into the page.
#[get("/?<order_id>")]
pub async fn lookup_page(
    order_id: Option<String>,
    service: &State<Arc<OrderService>>,
) -> RawHtml<String> {
    let Some(order_id) = order_id else {
        return RawHtml(render::page("", ""));
    };

    let result = HtmlContainer::default();
    let widget = OrderLookupWidget::new(
        Arc::clone(service.inner()),
        TextInput::new(order_id.as_str()),
        result.clone(),
    );
    widget.lookup().await;

    RawHtml(render::page(&order_id, &result.inner_html()))
}

// Route Configuration
pub fn routes() -> Vec<Route> {
    routes![health, get_order, lookup_page]
}
