//! Blocking HTTP facade over async reqwest.
//!
//! Uses async reqwest internally with a shared tokio runtime, but presents a
//! sync interface to the crawl loop, which is strictly sequential.

use std::sync::LazyLock;
use std::time::Duration;

use crate::error::CrawlError;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Whole-request timeout; wiki API responses are small
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
});

/// Shared tokio runtime for HTTP operations.
static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// HTTP GET returning the decoded JSON body.
///
/// The status code is checked before decoding: a non-2xx response is an
/// [`CrawlError::Http`], never a silent decode failure. A 2xx body that is
/// not valid JSON maps to [`CrawlError::Extract`], which is retryable.
pub fn get_json(url: &str, params: &[(String, String)]) -> Result<serde_json::Value, CrawlError> {
    let body = SHARED_RUNTIME.handle().block_on(async {
        let resp = SHARED_CLIENT
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| CrawlError::from_reqwest(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CrawlError::Http {
                status: Some(status.as_u16()),
                message: format!("GET {url}"),
            });
        }

        resp.text().await.map_err(|e| CrawlError::from_reqwest(&e))
    })?;

    serde_json::from_str(&body).map_err(|e| CrawlError::Extract(format!("invalid JSON body: {e}")))
}
