/// Failures of a lookup that never produced a usable response body.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Order body with status {status} could not be decoded: {source}")]
    MalformedOrder {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("Error body with status {status} could not be decoded: {source}")]
    MalformedError {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl LookupError {
    /// Status of the response that carried the undecodable body, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Request(_) => None,
            Self::MalformedOrder { status, .. } | Self::MalformedError { status, .. } => {
                Some(*status)
            }
        }
    }
}
