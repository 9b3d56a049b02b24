//! Bounded polling for page state.

use std::future::Future;
use std::time::Duration;

/// Default delay between two predicate evaluations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Poll `check` until it yields a value or `timeout` elapses.
///
/// The check runs immediately, then every `poll_interval`. A check still in
/// flight when the deadline passes is abandoned.
pub async fn wait_for<T, F, Fut>(mut check: F, timeout: Duration, poll_interval: Duration) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    tokio::time::timeout(timeout, async {
        loop {
            if let Some(value) = check().await {
                return value;
            }
            tokio::time::sleep(poll_interval).await;
        }
    })
    .await
    .ok()
}

/// Poll `predicate` until it holds; `false` when `timeout` elapses first.
pub async fn wait_until<F, Fut>(mut predicate: F, timeout: Duration, poll_interval: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let check = || {
        let fut = predicate();
        async move { fut.await.then_some(()) }
    };
    wait_for(check, timeout, poll_interval).await.is_some()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_succeeds_after_polls() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let ok = wait_until(
            move || async move { calls.fetch_add(1, Ordering::SeqCst) >= 3 },
            Duration::from_secs(5),
            Duration::from_millis(100),
        )
        .await;
        assert!(ok);
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_times_out() {
        let start = tokio::time::Instant::now();
        let ok = wait_until(|| async { false }, Duration::from_secs(15), Duration::from_millis(250)).await;
        assert!(!ok);
        assert!(start.elapsed() >= Duration::from_secs(15));
        assert!(start.elapsed() < Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_returns_value() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let value = wait_for(
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                (n == 2).then_some(n * 10)
            },
            Duration::from_secs(1),
            Duration::from_millis(10),
        )
        .await;
        assert_eq!(value, Some(20));
    }
}
