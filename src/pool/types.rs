//! Pool task type

use crate::error::Result;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// A deferred, zero-argument unit of async work.
///
/// Nothing runs until the pool starts the task; a task is consumed exactly
/// once.
pub struct Task<T> {
    run: Box<dyn FnOnce() -> BoxFuture<'static, Result<T>> + Send>,
}

impl<T> Task<T> {
    /// Wrap a closure producing the task's future
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            run: Box::new(move || Box::pin(f())),
        }
    }

    /// Start the task
    pub(crate) fn start(self) -> BoxFuture<'static, Result<T>> {
        (self.run)()
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}
