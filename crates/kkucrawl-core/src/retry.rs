//! Retry with fixed backoff for per-target crawl units

use std::time::Duration;

use crate::error::CrawlError;

/// Retry a fallible crawl unit with a fixed backoff between attempts.
///
/// The whole unit is rerun from scratch on each attempt (fetch included),
/// since a partial result from a failed attempt is never reusable.
///
/// Returns `Ok(T)` on first success, or the final `Err` after `max_attempts`
/// total attempts or on a non-retryable error. The caller decides whether an
/// exhausted target aborts the run (it should not).
pub fn retry_fixed<T>(
    target: &str,
    max_attempts: u32,
    backoff: Duration,
    mut attempt_fn: impl FnMut() -> Result<T, CrawlError>,
) -> Result<T, CrawlError> {
    let mut attempt = 1u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_attempts && e.is_retryable() => {
                log::warn!(
                    "{target}: attempt {attempt}/{max_attempts} failed: {e}, retrying in {backoff:?}"
                );
                attempt += 1;
                std::thread::sleep(backoff);
            }
            Err(e) => return Err(e),
        }
    }
}
