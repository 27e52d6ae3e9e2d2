//! Fixed-capacity worker pool with rejecting admission.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

/// Error type for dispatch admission.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// All worker slots are busy and there is no admission queue.
    #[error("worker pool saturated: all {0} slots busy")]
    Rejected(usize),
}

/// A fixed-size worker pool bounding how many requests run concurrently.
///
/// Models a finite connection pool: at no time do more than `capacity`
/// tasks hold a slot. Admission never blocks and never queues; a
/// submission with no free slot fails immediately with [`DispatchError::Rejected`].
#[derive(Debug)]
pub struct BoundedDispatcher {
    permits: Arc<Semaphore>,
    capacity: usize,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl BoundedDispatcher {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Admit and spawn a task if a worker slot is free.
    ///
    /// The slot is held for the task's whole lifetime and released when it
    /// settles, including by panic.
    pub fn try_dispatch<F, T>(&self, task: F) -> Result<JoinHandle<T>, DispatchError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .try_acquire_owned()
            .map_err(|_| DispatchError::Rejected(self.capacity))?;

        let slot = WorkerSlot::occupy(permit, &self.active, &self.peak);

        Ok(tokio::spawn(async move {
            let _slot = slot;
            task.await
        }))
    }

    /// Number of tasks currently holding a worker slot.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Highest concurrency observed since construction.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// RAII guard for one occupied worker slot.
///
/// Holds the semaphore permit and keeps the active count accurate even if
/// the task unwinds.
#[derive(Debug)]
struct WorkerSlot {
    active: Arc<AtomicUsize>,
    _permit: OwnedSemaphorePermit,
}

impl WorkerSlot {
    fn occupy(
        permit: OwnedSemaphorePermit,
        active: &Arc<AtomicUsize>,
        peak: &Arc<AtomicUsize>,
    ) -> Self {
        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self {
            active: Arc::clone(active),
            _permit: permit,
        }
    }
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
