//! Exponential backoff for the news search API.

use std::future::Future;
use std::time::Duration;

use crate::error::NewsError;

/// Rate limiting, network failures and 5xx responses are transient.
fn is_retriable(err: &NewsError) -> bool {
    match err {
        NewsError::RateLimited { .. } | NewsError::Http(_) => true,
        NewsError::UnexpectedStatus { status, .. } => *status >= 500,
        NewsError::Deserialize { .. } => false,
    }
}

/// Runs `operation`, retrying transient errors up to `max_retries` more
/// times. The wait before the n-th retry is `backoff_base_ms * 2^(n-1)`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, NewsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NewsError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                let delay_ms = backoff_base_ms.saturating_mul(1u64 << attempt.min(62));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "news search failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn retries_rate_limit_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(NewsError::RateLimited {
                        retry_after_secs: 1,
                    })
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result: Result<(), _> = retry_with_backoff(3, 0, || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                Err(NewsError::UnexpectedStatus {
                    status: 401,
                    url: "u".to_string(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(NewsError::UnexpectedStatus { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
