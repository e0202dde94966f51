/// Raw forecast page as served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    /// URL after redirects.
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{failure} ({detail})")]
pub struct FetchError {
    pub failure: FetchFailure,
    pub detail: String,
}

impl FetchError {
    pub(crate) fn new(failure: FetchFailure, detail: impl Into<String>) -> Self {
        Self {
            failure,
            detail: detail.into(),
        }
    }
}

/// Why the forecast page could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    #[error("page url is not valid")]
    BadUrl,
    #[error("server answered {0}")]
    Status(u16),
    #[error("server did not answer in time")]
    TimedOut,
    #[error("page exceeds {limit} bytes ({received} received)")]
    TooLarge { limit: u64, received: u64 },
    #[error("page is {0}, not html")]
    NotHtml(String),
    /// Connection, TLS, redirect loop and other transport trouble.
    #[error("server unreachable")]
    Unreachable,
}
