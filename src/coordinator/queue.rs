//! FIFO request queue with a fixed concurrency cap.
//!
//! Operations are enqueued at submission time and dispatched strictly in
//! submission order whenever fewer than `limit` are executing. Completion of
//! any operation (success, failure or panic) frees its slot and dispatches
//! the next waiting one.

use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::CoordinatorError;

/// Default number of operations allowed to execute at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 3;

type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// A submitted operation waiting for a free slot.
struct QueuedTask {
    id: u64,
    job: Job,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<QueuedTask>,
    active: usize,
}

struct Shared {
    state: Mutex<QueueState>,
    limit: usize,
    next_id: AtomicU64,
}

/// Bounded-concurrency FIFO queue.
///
/// Cloning is cheap and shares the same queue.
#[derive(Clone)]
pub struct RequestQueue {
    shared: Arc<Shared>,
}

impl RequestQueue {
    /// Create a queue allowing `limit` concurrent operations (minimum 1).
    pub fn new(limit: usize) -> Self {
        if limit == 0 {
            warn!("Concurrency limit of 0 requested, using 1");
        }

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState::default()),
                limit: limit.max(1),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Concurrency cap.
    pub fn limit(&self) -> usize {
        self.shared.limit
    }

    /// Number of operations currently executing.
    pub fn active(&self) -> usize {
        self.shared.state.lock().active
    }

    /// Number of operations waiting for a slot.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    /// Enqueue `operation` and return a handle to its result.
    ///
    /// The operation is queued immediately, not when the handle is first
    /// polled. It starts once a slot is free and every earlier submission has
    /// started. Its output is delivered untouched; dropping the handle does
    /// not cancel it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit<F, Fut, T>(&self, operation: F) -> TaskHandle<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);

        let job: Job = Box::new(move || {
            async move {
                let output = operation().await;
                // Caller may have dropped the handle; the result is discarded.
                let _ = tx.send(output);
            }
            .boxed()
        });

        self.shared
            .state
            .lock()
            .pending
            .push_back(QueuedTask { id, job });
        debug!("Queued task #{}", id);

        Shared::dispatch(&self.shared);

        TaskHandle { id, rx }
    }
}

impl Shared {
    /// Start waiting tasks until the cap is reached or the queue is empty.
    fn dispatch(shared: &Arc<Shared>) {
        loop {
            let task = {
                let mut state = shared.state.lock();
                if state.active >= shared.limit {
                    return;
                }
                let Some(task) = state.pending.pop_front() else {
                    return;
                };
                state.active += 1;
                debug!(
                    "Dispatching task #{} ({}/{} active, {} waiting)",
                    task.id,
                    state.active,
                    shared.limit,
                    state.pending.len()
                );
                task
            };

            let shared = Arc::clone(shared);
            tokio::spawn(async move {
                let QueuedTask { id, job } = task;
                if AssertUnwindSafe(job()).catch_unwind().await.is_err() {
                    warn!("Task #{} panicked", id);
                }
                shared.finish();
            });
        }
    }

    fn finish(self: Arc<Self>) {
        {
            let mut state = self.state.lock();
            state.active = state.active.saturating_sub(1);
        }
        Shared::dispatch(&self);
    }
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("RequestQueue")
            .field("limit", &self.shared.limit)
            .field("active", &state.active)
            .field("pending", &state.pending.len())
            .finish()
    }
}

/// Resolves with the output of a submitted operation.
#[derive(Debug)]
pub struct TaskHandle<T> {
    id: u64,
    rx: oneshot::Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Submission sequence number.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, CoordinatorError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| CoordinatorError::TaskLost))
    }
}
