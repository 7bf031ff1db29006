//! Common error type for crawl operations

/// Error from processing a single crawl target (fetch + extract).
///
/// Retryability drives the [`retry`](crate::retry) executor: transport and
/// extraction failures are retried, API-reported errors are not.
#[derive(Debug)]
pub enum CrawlError {
    /// Non-2xx status or transport failure
    Http {
        status: Option<u16>,
        message: String,
    },
    /// The API returned an `error` payload in the response body
    Query(serde_json::Value),
    /// Response decoded but the expected structure was missing or malformed
    Extract(String),
    /// Local I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for CrawlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Query(payload) => write!(f, "API error: {payload}"),
            Self::Extract(reason) => write!(f, "extraction failed: {reason}"),
            Self::Io(e) => write!(f, "IO: {e}"),
        }
    }
}

impl std::error::Error for CrawlError {}

impl From<std::io::Error> for CrawlError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl CrawlError {
    /// Build an HTTP error from a reqwest error, keeping the status if known.
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            // The wiki answered; asking again yields the same answer
            Self::Query(_) => false,
            // Transient server glitches are indistinguishable from real
            // absence, so extraction failures stay retryable
            Self::Http { .. } | Self::Extract(_) => true,
            Self::Io(e) => e.kind() != std::io::ErrorKind::StorageFull,
        }
    }
}
