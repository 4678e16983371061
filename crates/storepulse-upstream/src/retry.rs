//! Retry with exponential back-off and jitter for upstream calls.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 5xx). Shape errors and auth failures
//! are returned immediately: repeating the call cannot fix them.
//!
//! Only scheduled background work should wrap calls in this helper. The
//! report read path serves callers interactively and surfaces the first
//! failure instead of sitting in a back-off loop.

use std::future::Future;
use std::time::Duration;

use crate::error::UpstreamError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 5xx responses: transient server/infrastructure errors.
///
/// **Not retriable (hard stop):**
/// - HTTP 4xx responses: the request itself is wrong or unauthorized.
/// - [`UpstreamError::Token`]: no credential configured; retrying won't mint one.
/// - [`UpstreamError::Format`] / [`UpstreamError::Deserialize`]: malformed
///   response; retrying won't fix it.
pub fn is_retriable(err: &UpstreamError) -> bool {
    match err {
        UpstreamError::Transport(e) => e.is_timeout() || e.is_connect(),
        UpstreamError::Status { status, .. } => *status >= 500,
        UpstreamError::Deserialize { .. }
        | UpstreamError::Format { .. }
        | UpstreamError::Token(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt        |
/// |---------|----------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter     |
/// | 3       | 1 000 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 60 s. Non-retriable errors are returned immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, UpstreamError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "upstream transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
