//! kkucrawl core - shared infrastructure for the wiki crawl pipelines
//!
//! HTTP facade, error taxonomy, fixed-backoff retry, checkpointed JSON
//! output, target-list loading, logging and progress plumbing.

pub mod error;
pub mod http;
pub mod logging;
pub mod progress;
pub mod retry;
pub mod sink;
pub mod targets;

// Re-exports for convenience
pub use error::CrawlError;
pub use http::{get_json, http_client};
pub use logging::{ProgressLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use retry::retry_fixed;
pub use sink::{Countdown, JsonSink};
pub use targets::load_targets;
