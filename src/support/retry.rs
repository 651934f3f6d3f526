//! Bounded-attempt async retry with linear backoff.
//!
//! Mirrors `original_source/api/utils/retry.py`: runs `op`, and on an error the
//! caller classifies as retryable, sleeps `attempt * base_delay` before trying
//! again. Unclassified errors propagate on the first attempt. No jitter.

use std::future::Future;
use std::time::Duration;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Retry `op` up to `attempts` times, reclassifying each failure with
/// `is_retryable`. The last error is returned once attempts are exhausted.
pub async fn retry_async<T, E, F, Fut>(
    mut op: F,
    is_retryable: impl Fn(&E) -> bool,
    attempts: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_err = None;
    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retryable(&err) {
                    return Err(err);
                }
                last_err = Some(err);
                if attempt == attempts {
                    break;
                }
                tokio::time::sleep(base_delay * attempt).await;
            }
        }
    }
    Err(last_err.expect("loop runs at least once"))
}

/// Convenience wrapper using the default attempt count and base delay.
pub async fn retry_default<T, E, F, Fut>(op: F, is_retryable: impl Fn(&E) -> bool) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_async(op, is_retryable, DEFAULT_ATTEMPTS, DEFAULT_BASE_DELAY).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_without_retry() {
        let calls = AtomicU32::new(0);
        let result = retry_async(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, &str>(42) }
            },
            |_| true,
            3,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_classified_errors_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = retry_async(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err::<i32, _>("transient")
                    } else {
                        Ok(42)
                    }
                }
            },
            |_| true,
            3,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn reraises_last_error_after_exhausting_attempts() {
        let calls = AtomicU32::new(0);
        let result = retry_async(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>("persistent") }
            },
            |_| true,
            3,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Err("persistent"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unclassified_errors_propagate_immediately() {
        let calls = AtomicU32::new(0);
        let result = retry_async(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>("fatal") }
            },
            |_| false,
            3,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Err("fatal"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
