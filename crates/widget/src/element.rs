use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

/// The text field holding the order identifier.
pub trait InputElement: Send + Sync {
    fn value(&self) -> String;
}

/// The container whose content is replaced on every render.
pub trait ResultElement: Send + Sync {
    fn set_inner_html(&self, html: String);
}

/// In-memory text field. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: Arc<RwLock<String>>,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(RwLock::new(value.into())),
        }
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value.into();
    }
}

impl InputElement for TextInput {
    fn value(&self) -> String {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// In-memory result container. Clones share the same content, the last
/// write wins.
#[derive(Debug, Clone, Default)]
pub struct HtmlContainer {
    html: Arc<RwLock<String>>,
}

impl HtmlContainer {
    pub fn inner_html(&self) -> String {
        self.html
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResultElement for HtmlContainer {
    fn set_inner_html(&self, html: String) {
        *self.html.write().unwrap_or_else(PoisonError::into_inner) = html;
    }
}

/// Trigger element. Every `click` is delivered to the widget bound to the
/// paired [`Clicks`].
#[derive(Debug, Clone)]
pub struct LookupButton {
    clicks: mpsc::UnboundedSender<()>,
}

#[derive(Debug)]
pub struct Clicks {
    receiver: mpsc::UnboundedReceiver<()>,
}

impl LookupButton {
    pub fn channel() -> (Self, Clicks) {
        let (clicks, receiver) = mpsc::unbounded_channel();
        (Self { clicks }, Clicks { receiver })
    }

    /// Returns `false` once no widget is listening.
    pub fn click(&self) -> bool {
        self.clicks.send(()).is_ok()
    }
}

impl Clicks {
    pub async fn next(&mut self) -> Option<()> {
        self.receiver.recv().await
    }
}
