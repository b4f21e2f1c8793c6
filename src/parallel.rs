//! Bounded Task Runner
//!
//! A [`RunnerPool`] owns the concurrency budget of a whole scan: one
//! semaphore and one cancellation scope. Every supplier call derives its own
//! [`TaskRunner`] from the pool, so all suppliers share the cap on concurrent
//! remote reads while each one collects an isolated result set.
//!
//! Error policy: the first task error wins. Once a runner has seen an error
//! it stops dispatching, lets in-flight tasks drain, and `wait` reports that
//! first error only.

use crate::error::{Error, Result};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Concurrency used when none is configured
pub const DEFAULT_PARALLELISM: usize = 10;

/// Shared concurrency budget and cancellation scope for one scan
#[derive(Debug, Clone)]
pub struct RunnerPool {
    permits: Arc<Semaphore>,
    scope: CancellationToken,
    limit: usize,
}

impl RunnerPool {
    /// Create a pool with its own cancellation scope
    pub fn new(limit: usize) -> Self {
        Self::with_scope(limit, CancellationToken::new())
    }

    /// Create a pool bound to an existing cancellation scope
    pub fn with_scope(limit: usize, scope: CancellationToken) -> Self {
        let limit = if limit == 0 {
            tracing::warn!("Parallelism of 0 requested, using 1");
            1
        } else {
            limit
        };

        Self {
            permits: Arc::new(Semaphore::new(limit)),
            scope,
            limit,
        }
    }

    /// Derive a sub-runner sharing this pool's budget
    pub fn runner<T: Send + 'static>(&self) -> TaskRunner<T> {
        TaskRunner {
            permits: Arc::clone(&self.permits),
            scope: self.scope.clone(),
            failed: self.scope.child_token(),
            first_error: Arc::new(Mutex::new(None)),
            tasks: JoinSet::new(),
            submitted: 0,
        }
    }

    /// Maximum number of tasks running at once across all sub-runners
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn scope(&self) -> &CancellationToken {
        &self.scope
    }

    /// Stop dispatching and unblock every pending submit and wait
    pub fn cancel(&self) {
        self.scope.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }
}

impl Default for RunnerPool {
    fn default() -> Self {
        Self::new(DEFAULT_PARALLELISM)
    }
}

/// Collects the results of the tasks submitted by one supplier call
///
/// `wait` consumes the runner, so it can only be awaited once.
pub struct TaskRunner<T: Send + 'static> {
    permits: Arc<Semaphore>,
    scope: CancellationToken,
    /// Cancelled on the first task error; child of `scope`
    failed: CancellationToken,
    first_error: Arc<Mutex<Option<Error>>>,
    tasks: JoinSet<Option<T>>,
    submitted: usize,
}

impl<T: Send + 'static> TaskRunner<T> {
    /// Enqueue a task, waiting for a free slot in the pool
    ///
    /// Returns [`Error::Cancelled`] if the scan scope is cancelled before a
    /// slot frees up. Tasks submitted after this runner has failed are
    /// dropped without running.
    pub async fn submit<F>(&mut self, task: F) -> Result<()>
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        if self.scope.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let permit = tokio::select! {
            biased;
            _ = self.scope.cancelled() => return Err(Error::Cancelled),
            _ = self.failed.cancelled() => {
                tracing::debug!("Runner already failed, skipping task");
                return Ok(());
            }
            permit = Arc::clone(&self.permits).acquire_owned() => {
                permit.map_err(|_| Error::Cancelled)?
            }
        };

        let failed = self.failed.clone();
        let first_error = Arc::clone(&self.first_error);
        self.tasks.spawn(async move {
            let _permit = permit;
            match task.await {
                Ok(value) => Some(value),
                Err(err) => {
                    record_error(&first_error, err);
                    failed.cancel();
                    None
                }
            }
        });
        self.submitted += 1;

        Ok(())
    }

    /// Number of tasks accepted so far
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Wait for every submitted task and collect their values
    ///
    /// Values come back in completion order. If any task failed, the first
    /// failure is returned instead.
    pub async fn wait(mut self) -> Result<Vec<T>> {
        let mut values = Vec::with_capacity(self.submitted);

        loop {
            tokio::select! {
                biased;
                _ = self.scope.cancelled() => {
                    // Running tasks finish on their own; their results are dropped
                    self.tasks.detach_all();
                    return Err(Error::Cancelled);
                }
                joined = self.tasks.join_next() => match joined {
                    None => break,
                    Some(Ok(Some(value))) => values.push(value),
                    Some(Ok(None)) => {}
                    Some(Err(join_err)) => {
                        record_error(&self.first_error, Error::Task(join_err.to_string()));
                        self.failed.cancel();
                    }
                },
            }
        }

        let first_error = self
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match first_error {
            Some(err) => Err(err),
            None => Ok(values),
        }
    }
}

impl<T: Send + 'static> Drop for TaskRunner<T> {
    fn drop(&mut self) {
        // Never abort reads that are already talking to the API
        self.tasks.detach_all();
    }
}

fn record_error(slot: &Mutex<Option<Error>>, err: Error) {
    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        *slot = Some(err);
    } else {
        tracing::debug!("Discarding subsequent task error: {}", err);
    }
}
