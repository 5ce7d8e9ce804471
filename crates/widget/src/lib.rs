//! Order lookup widget: reads an order id from an input element, fetches the
//! order over HTTP and renders it into a result container.

pub mod element;
pub mod error;
pub mod model;
pub mod render;
pub mod source;
pub mod widget;

#[cfg(test)]
pub mod test_utils;

pub use element::{Clicks, HtmlContainer, InputElement, LookupButton, ResultElement, TextInput};
pub use error::LookupError;
pub use model::{Delivery, ErrorCode, ErrorPayload, Item, OrderRecord, Payment};
pub use source::{HttpOrderSource, LookupResponse, OrderSource};
pub use widget::{LookupOutcome, OrderLookupWidget};
