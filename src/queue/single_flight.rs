//! Keyed single-flight critical sections.
//!
//! At most one execution per key is in flight; a second caller awaits the
//! first caller's shared future and observes its result (success or
//! failure) instead of starting a duplicate. Used to guard "export in
//! progress" and similar named operations.

use std::collections::HashMap;
use std::future::Future;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::debug;
use crate::utils::{EditorError, EditorResult};

type SharedFlight<T> = Shared<BoxFuture<'static, Result<T, EditorError>>>;

/// Single-flight lock over string keys.
///
/// `T` must be `Clone` because every waiter receives its own copy of the
/// one result.
pub struct SingleFlight<T: Clone> {
    inflight: Mutex<HashMap<String, SharedFlight<T>>>,
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `make()` under `key`, or joins the execution already in flight.
    ///
    /// `make` is only invoked by the caller that wins the key; latecomers
    /// share the winner's result. Once the flight completes the key is
    /// cleared, so the next call starts fresh.
    pub async fn run<F, Fut>(&self, key: &str, make: F) -> EditorResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = EditorResult<T>> + Send + 'static,
    {
        let (flight, owns_key) = {
            let mut inflight = self.inflight.lock().await;
            match inflight.get(key) {
                Some(existing) => {
                    debug!("Joining in-flight '{}'", key);
                    (existing.clone(), false)
                }
                None => {
                    let flight: SharedFlight<T> =
                        (Box::pin(make()) as BoxFuture<'static, EditorResult<T>>).shared();
                    inflight.insert(key.to_string(), flight.clone());
                    (flight, true)
                }
            }
        };

        let result = flight.await;
        if owns_key {
            self.inflight.lock().await.remove(key);
        }
        result
    }

    /// Whether an execution is currently in flight for `key`.
    pub async fn is_in_flight(&self, key: &str) -> bool {
        self.inflight.lock().await.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[tokio::test]
    async fn second_caller_shares_the_first_result() {
        let flight = Arc::new(SingleFlight::<u32>::new());
        let release = Arc::new(Notify::new());
        let b_ran = Arc::new(AtomicBool::new(false));

        let gate = release.clone();
        let first = {
            let flight = flight.clone();
            tokio::spawn(async move {
                flight
                    .run("export", move || async move {
                        gate.notified().await;
                        Ok(7)
                    })
                    .await
            })
        };

        // Let the first caller win the key before the second arrives.
        tokio::task::yield_now().await;
        assert!(flight.is_in_flight("export").await);

        let second = {
            let flight = flight.clone();
            let b_ran = b_ran.clone();
            tokio::spawn(async move {
                flight
                    .run("export", move || async move {
                        b_ran.store(true, Ordering::SeqCst);
                        Ok(99)
                    })
                    .await
            })
        };

        tokio::task::yield_now().await;
        release.notify_waiters();

        let a = first.await.unwrap().unwrap();
        let b = second.await.unwrap().unwrap();
        assert_eq!(a, 7);
        assert_eq!(b, 7, "waiter must observe the winner's result");
        assert!(!b_ran.load(Ordering::SeqCst), "second operation must never run");
    }

    #[tokio::test]
    async fn failures_are_shared_too() {
        let flight = Arc::new(SingleFlight::<u32>::new());
        let release = Arc::new(Notify::new());

        let gate = release.clone();
        let first = {
            let flight = flight.clone();
            tokio::spawn(async move {
                flight
                    .run("export", move || async move {
                        gate.notified().await;
                        Err(EditorError::permission_denied("gallery"))
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;

        let second = {
            let flight = flight.clone();
            tokio::spawn(async move { flight.run("export", || async { Ok(1) }).await })
        };
        tokio::task::yield_now().await;
        release.notify_waiters();

        assert!(matches!(first.await.unwrap(), Err(EditorError::PermissionDenied(_))));
        assert!(matches!(second.await.unwrap(), Err(EditorError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn key_clears_after_completion() {
        let flight = SingleFlight::<u32>::new();
        let runs = AtomicUsize::new(0);
        for _ in 0..2 {
            let result = flight
                .run("thumbs", || {
                    runs.fetch_add(1, Ordering::SeqCst);
                    async { Ok(5) }
                })
                .await
                .unwrap();
            assert_eq!(result, 5);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert!(!flight.is_in_flight("thumbs").await);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_interfere() {
        let flight = SingleFlight::<u32>::new();
        let a = flight.run("a", || async { Ok(1) }).await.unwrap();
        let b = flight.run("b", || async { Ok(2) }).await.unwrap();
        assert_eq!((a, b), (1, 2));
    }

    #[tokio::test]
    async fn default_constructs_without_thread_safety_bounds() {
        // Default only needs `T: Clone`, unlike `run` which needs the
        // shared-result bounds.
        struct NotSync(std::cell::Cell<u32>);
        impl Clone for NotSync {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }
        let _ = SingleFlight::<NotSync>::default();

        let flight = SingleFlight::<u32>::default();
        let value = flight.run("k", || async { Ok(3) }).await.unwrap();
        assert_eq!(value, 3);
    }
}
