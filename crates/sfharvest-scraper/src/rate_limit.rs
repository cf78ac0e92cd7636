//! Bounded retry with linear backoff for storefront requests.
//!
//! Every failure is retried until the attempt budget is spent: a 404 or a
//! malformed body goes through the same path as a dropped connection. The
//! final error is wrapped in [`ScraperError::RetriesExhausted`] so callers can
//! still see whether the storefront answered 429 or 404 last.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Runs `operation` up to `max_attempts` times.
///
/// The wait before attempt `n + 1` is `backoff_base_ms * n`. No wait follows
/// the final attempt.
///
/// # Backoff schedule (example with `backoff_base_ms = 1_000`, `max_attempts = 3`)
///
/// | Attempt | Sleep before next attempt |
/// |---------|---------------------------|
/// | 1       | 1 000 ms                  |
/// | 2       | 2 000 ms                  |
/// | 3       | none, error returned      |
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    resource: &str,
    max_attempts: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= max_attempts {
                    return Err(ScraperError::RetriesExhausted {
                        resource: resource.to_owned(),
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }

                let delay_ms = backoff_base_ms.saturating_mul(u64::from(attempt));
                tracing::warn!(
                    resource,
                    attempt,
                    max_attempts,
                    delay_ms,
                    error = %err,
                    "storefront request failed; retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
        }
    }
}
