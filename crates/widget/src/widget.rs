use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::element::{Clicks, InputElement, ResultElement};
use crate::error::LookupError;
use crate::model::{ErrorPayload, OrderRecord};
use crate::render;
use crate::source::{LookupResponse, OrderSource};

/// What a single lookup rendered.
#[derive(Debug)]
pub enum LookupOutcome {
    NotEntered,
    Found(Box<OrderRecord>),
    Rejected { status: u16, error: ErrorPayload },
    Failed(LookupError),
}

/// Reads an order id from `input`, fetches it from `source` and renders the
/// result into `result`. Holds no state between lookups.
pub struct OrderLookupWidget<S: ?Sized, I, R> {
    source: Arc<S>,
    input: I,
    result: R,
}

impl<S, I, R> OrderLookupWidget<S, I, R>
where
    S: OrderSource + ?Sized,
    I: InputElement,
    R: ResultElement,
{
    pub fn new(source: Arc<S>, input: I, result: R) -> Self {
        Self {
            source,
            input,
            result,
        }
    }

    /// Click handler.
    pub async fn lookup(&self) -> LookupOutcome {
        let order_id = self.input.value();

        if order_id.trim().is_empty() {
            debug!("Lookup triggered without an order id");
            self.result.set_inner_html(render::not_entered());
            return LookupOutcome::NotEntered;
        }

        match self.source.fetch(&order_id).await {
            Ok(LookupResponse::Found(order)) => {
                info!("Rendering order {}", order.order_uid);
                self.result.set_inner_html(render::order(&order));
                LookupOutcome::Found(order)
            }
            Ok(LookupResponse::Rejected { status, error }) => {
                info!(
                    "Order lookup for {order_id} rejected with status {status}: {} {}",
                    error.code, error.msg
                );
                self.result.set_inner_html(render::error(&error));
                LookupOutcome::Rejected { status, error }
            }
            Err(err) => {
                warn!("Order lookup for {order_id} failed: {err}");
                self.result.set_inner_html(render::failure(&err));
                LookupOutcome::Failed(err)
            }
        }
    }
}

impl<S, I, R> OrderLookupWidget<S, I, R>
where
    S: OrderSource + ?Sized + 'static,
    I: InputElement + 'static,
    R: ResultElement + 'static,
{
    /// Runs one lookup task per click until the button is dropped. Lookups
    /// are not de-duplicated or cancelled; the last one to finish owns the
    /// result container.
    pub fn bind(self: Arc<Self>, mut clicks: Clicks) -> JoinHandle<()> {
        tokio::spawn(async move {
            while clicks.next().await.is_some() {
                let widget = Arc::clone(&self);
                tokio::spawn(async move {
                    widget.lookup().await;
                });
            }
            debug!("Lookup button dropped, unbinding widget");
        })
    }
}
