//! Memory-aware operation queue.
//!
//! Expensive operations (thumbnail generation, high-res capture, staged
//! resizes) are funneled through this scheduler so their combined memory
//! estimates never exceed the platform budget. A drain task owns execution;
//! callers get their typed result back through a oneshot.
//!
//! There is no cancellation token: the per-operation timeout race is the
//! only cancellation-equivalent, and it cannot stop platform-level work
//! already issued; it only rejects the caller and releases the
//! reservation.

use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use futures::future::BoxFuture;
use tokio::sync::{oneshot, Mutex, Notify, Semaphore};
use tracing::{debug, info, warn};
use crate::platform::CacheClearer;
use crate::queue::profile::PlatformProfile;
use crate::utils::{sweep_temp_files, EditorError, EditorResult};

/// Scheduling priority. High entries are dequeued before normals
/// regardless of enqueue order; FIFO among equals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Normal,
}

/// Descriptor for one queued operation.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    /// Short name for logs and timeout errors.
    pub name: String,
    pub priority: Priority,
    /// Peak memory the operation is expected to hold, in MB.
    pub memory_estimate_mb: f64,
    pub timeout_ms: u64,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>, priority: Priority, memory_estimate_mb: f64, timeout_ms: u64) -> Self {
        Self {
            name: name.into(),
            priority,
            memory_estimate_mb,
            timeout_ms,
        }
    }
}

struct Job {
    spec: OperationSpec,
    // Type-erased: the caller's result travels through a oneshot captured
    // inside. Always completes because the timeout race is baked in.
    fut: BoxFuture<'static, ()>,
}

struct QueueState {
    profile: PlatformProfile,
    temp_dir: PathBuf,
    cache: Option<Arc<dyn CacheClearer>>,
    pending: Mutex<VecDeque<Job>>,
    wakeup: Notify,
    usage_mb: Mutex<f64>,
    running: Arc<Semaphore>,
}

/// The scheduler handle. Cheap to clone; all clones share one drain task.
#[derive(Clone)]
pub struct OperationQueue {
    state: Arc<QueueState>,
}

impl OperationQueue {
    /// Creates the queue and spawns its drain task.
    ///
    /// Must be called from within a tokio runtime. `temp_dir` is the
    /// directory cleanup passes sweep; `cache` is the optional image-cache
    /// collaborator invoked by those passes.
    pub fn new(
        profile: PlatformProfile,
        temp_dir: PathBuf,
        cache: Option<Arc<dyn CacheClearer>>,
    ) -> Self {
        debug!(
            "Creating operation queue (max_concurrent: {}, threshold: {}MB)",
            profile.max_concurrent, profile.memory_threshold_mb
        );
        let state = Arc::new(QueueState {
            running: Arc::new(Semaphore::new(profile.max_concurrent)),
            profile,
            temp_dir,
            cache,
            pending: Mutex::new(VecDeque::new()),
            wakeup: Notify::new(),
            usage_mb: Mutex::new(0.0),
        });
        tokio::spawn(drain(Arc::clone(&state)));
        Self { state }
    }

    /// Enqueues `op` and waits for its result.
    ///
    /// The operation is raced against `spec.timeout_ms`; on timeout the
    /// caller gets [`EditorError::Timeout`] and the memory reservation is
    /// still released, so subsequent items keep flowing.
    pub async fn run<T, Fut>(&self, spec: OperationSpec, op: Fut) -> EditorResult<T>
    where
        T: Send + 'static,
        Fut: Future<Output = EditorResult<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let name = spec.name.clone();
        let timeout = Duration::from_millis(spec.timeout_ms);
        let timeout_ms = spec.timeout_ms;
        let fut: BoxFuture<'static, ()> = Box::pin(async move {
            let outcome = match tokio::time::timeout(timeout, op).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Operation '{}' timed out after {}ms", name, timeout_ms);
                    Err(EditorError::timeout(name, timeout_ms))
                }
            };
            // Receiver may have been dropped; nothing to do then.
            let _ = tx.send(outcome);
        });

        self.push(Job { spec, fut }).await;
        self.state.wakeup.notify_one();
        rx.await
            .map_err(|_| EditorError::io("Operation dropped before completion"))?
    }

    async fn push(&self, job: Job) {
        let mut pending = self.state.pending.lock().await;
        match job.spec.priority {
            Priority::High => {
                // Ahead of normals, behind earlier highs (FIFO among equals).
                let pos = pending
                    .iter()
                    .take_while(|queued| queued.spec.priority == Priority::High)
                    .count();
                pending.insert(pos, job);
            }
            Priority::Normal => pending.push_back(job),
        }
    }

    /// Sum of reserved memory estimates currently in flight, in MB.
    pub async fn current_usage_mb(&self) -> f64 {
        *self.state.usage_mb.lock().await
    }

    /// Number of operations waiting for execution.
    pub async fn queue_length(&self) -> usize {
        self.state.pending.lock().await.len()
    }

    /// Nuke-and-recover escape hatch: deletes temp files regardless of age,
    /// clears all known caches and resets the usage counter to zero. Not
    /// expected on the happy path.
    pub async fn emergency_cleanup(&self) {
        self.state.emergency_cleanup().await;
    }
}

impl QueueState {
    async fn pop(&self) -> Option<Job> {
        self.pending.lock().await.pop_front()
    }

    async fn reserve(&self, estimate_mb: f64) {
        let mut usage = self.usage_mb.lock().await;
        *usage += estimate_mb;
        debug!("Reserved {:.0}MB (usage now {:.0}MB)", estimate_mb, *usage);
    }

    async fn release(&self, estimate_mb: f64) {
        let mut usage = self.usage_mb.lock().await;
        *usage = (*usage - estimate_mb).max(0.0);
        debug!("Released {:.0}MB (usage now {:.0}MB)", estimate_mb, *usage);
    }

    /// Admission check: if the reservation would exceed the budget, run a
    /// routine cleanup, wait for it to settle, and fall back to emergency
    /// cleanup if that was not enough.
    async fn admit(&self, spec: &OperationSpec) {
        let projected = *self.usage_mb.lock().await + spec.memory_estimate_mb;
        if projected <= self.profile.memory_threshold_mb {
            return;
        }
        warn!(
            "'{}' would push usage to {:.0}MB (threshold {:.0}MB); running cleanup",
            spec.name, projected, self.profile.memory_threshold_mb
        );
        self.cleanup_pass().await;
        tokio::time::sleep(self.profile.settle_delay).await;

        let projected = *self.usage_mb.lock().await + spec.memory_estimate_mb;
        if projected > self.profile.memory_threshold_mb {
            self.emergency_cleanup().await;
        }
    }

    /// Routine cleanup: expire temp files by age, poke the image cache.
    async fn cleanup_pass(&self) {
        let removed = sweep_temp_files(&self.temp_dir, self.profile.temp_max_age).await;
        if let Some(cache) = &self.cache {
            cache.clear(self.profile.aggressive_cleanup);
        }
        debug!("Cleanup pass done ({} temp file(s) removed)", removed);
    }

    async fn emergency_cleanup(&self) {
        info!("Emergency cleanup: clearing temp files, caches and usage counter");
        sweep_temp_files(&self.temp_dir, Duration::ZERO).await;
        if let Some(cache) = &self.cache {
            cache.clear(true);
        }
        *self.usage_mb.lock().await = 0.0;
    }
}

async fn drain(state: Arc<QueueState>) {
    loop {
        let job = loop {
            match state.pop().await {
                Some(job) => break job,
                None => state.wakeup.notified().await,
            }
        };

        // The semaphore is never closed; acquire only fails at shutdown.
        let Ok(permit) = Arc::clone(&state.running).acquire_owned().await else {
            return;
        };

        state.admit(&job.spec).await;
        state.reserve(job.spec.memory_estimate_mb).await;
        debug!("Starting '{}' ({:?})", job.spec.name, job.spec.priority);

        if state.profile.is_strict_sequential() {
            job.fut.await;
            state.release(job.spec.memory_estimate_mb).await;
            // Strict policy: cleanup and a breather after every operation,
            // success or failure.
            state.cleanup_pass().await;
            if !state.profile.inter_op_delay.is_zero() {
                tokio::time::sleep(state.profile.inter_op_delay).await;
            }
            drop(permit);
        } else {
            let state = Arc::clone(&state);
            let estimate = job.spec.memory_estimate_mb;
            tokio::spawn(async move {
                job.fut.await;
                state.release(estimate).await;
                drop(permit);
            });
        }
    }
}
