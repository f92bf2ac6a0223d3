use std::sync::Arc;

use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};

/// Process-wide ceiling on concurrent alert-query HTTP calls.
///
/// Clones share the same permits. A permit covers exactly one HTTP call; the query engine
/// acquires it inside each retry attempt and drops it before any backoff sleep.
#[derive(Debug, Clone)]
pub struct QueryLimiter {
    inner: Arc<Semaphore>,
    capacity: usize,
}

impl QueryLimiter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, AcquireError> {
        self.inner.acquire().await
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        self.inner.available_permits()
    }
}
