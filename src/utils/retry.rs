//! Bounded readiness polling.
//!
//! Rendered surfaces come up asynchronously: a capture target may not be
//! mounted or laid out yet when an export starts. `await_ready` bridges that
//! imperative lifecycle with a bounded retry loop instead of per-call-site
//! polling.

use std::future::Future;
use std::time::Duration;
use tracing::debug;
use crate::utils::{EditorError, EditorResult};

/// Polls `probe` until it reports ready, up to `max_attempts` with
/// `interval` between attempts.
///
/// Returns [`EditorError::NotReady`] once the attempts are exhausted; the
/// caller must treat that as fatal for the current operation rather than
/// retrying further.
pub async fn await_ready<F, Fut>(
    what: &str,
    mut probe: F,
    max_attempts: u32,
    interval: Duration,
) -> EditorResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for attempt in 1..=max_attempts {
        if probe().await {
            if attempt > 1 {
                debug!("'{}' became ready on attempt {}/{}", what, attempt, max_attempts);
            }
            return Ok(());
        }
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Err(EditorError::not_ready(format!(
        "'{}' not ready after {} attempts",
        what, max_attempts
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn succeeds_once_probe_turns_ready() {
        let calls = Arc::new(AtomicU32::new(0));
        let probe_calls = calls.clone();
        let result = await_ready(
            "surface",
            move || {
                let calls = probe_calls.clone();
                async move { calls.fetch_add(1, Ordering::SeqCst) >= 2 }
            },
            5,
            Duration::from_millis(100),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fails_with_not_ready_after_bound() {
        let result = await_ready("surface", || async { false }, 3, Duration::from_millis(50)).await;
        assert!(matches!(result, Err(EditorError::NotReady(_))));
    }
}
