//! Bounded-concurrency task pool
//!
//! Runs a list of [`Task`]s with at most `limit` of them in flight. A fixed
//! set of workers pulls from a shared queue and pushes outcomes into a
//! results channel; the pool returns once every worker has exited.
//!
//! Results come back in settlement order. On the first failure no further
//! tasks are started, the ones already running are allowed to finish, and
//! the first failure is returned as [`Error::Pool`].

mod types;

pub use types::Task;

use crate::error::{Error, Result};
use futures::future::{self, FutureExt};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Executor with a fixed concurrency limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyPool {
    limit: usize,
}

impl ConcurrencyPool {
    /// Create a pool; `limit` must be at least 1
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::invalid_value(
                "max_concurrent_requests",
                "concurrency limit must be at least 1",
            ));
        }
        Ok(Self { limit })
    }

    /// Maximum number of tasks in flight
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run every task and collect the results in settlement order
    pub async fn run_all<T: Send + 'static>(&self, tasks: Vec<Task<T>>) -> Result<Vec<T>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let total = tasks.len();
        let worker_count = self.limit.min(total);
        debug!("Running {} tasks on {} workers", total, worker_count);

        let queue = Arc::new(Mutex::new(tasks.into_iter().enumerate().collect::<VecDeque<_>>()));
        let failed = Arc::new(AtomicBool::new(false));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();

        let mut workers = JoinSet::new();
        for _ in 0..worker_count {
            let queue = Arc::clone(&queue);
            let failed = Arc::clone(&failed);
            let results = result_tx.clone();

            workers.spawn(async move {
                while !failed.load(Ordering::Acquire) {
                    let Some((index, task)) = queue.lock().await.pop_front() else {
                        break;
                    };

                    // Starting the task runs its closure, which may panic too
                    let guarded = AssertUnwindSafe(future::lazy(|_| task.start()).flatten());
                    let outcome = match guarded.catch_unwind().await {
                        Ok(outcome) => outcome.map_err(|e| Error::pool(index, e)),
                        Err(payload) => Err(Error::TaskPanicked {
                            task: index,
                            message: panic_message(payload.as_ref()),
                        }),
                    };

                    if outcome.is_err() {
                        failed.store(true, Ordering::Release);
                    }
                    if results.send(outcome).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut values = Vec::with_capacity(total);
        let mut first_error = None;

        while let Some(outcome) = result_rx.recv().await {
            match outcome {
                Ok(value) => values.push(value),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => warn!("Additional task failure while draining: {}", e),
            }
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                first_error.get_or_insert_with(|| Error::Other(format!("Pool worker failed: {e}")));
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(values),
        }
    }
}

/// Run `tasks` with at most `limit` in flight
pub async fn run_all<T: Send + 'static>(tasks: Vec<Task<T>>, limit: usize) -> Result<Vec<T>> {
    ConcurrencyPool::new(limit)?.run_all(tasks).await
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
