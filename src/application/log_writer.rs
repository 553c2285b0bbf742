//! Asynchronous call log writer
//!
//! Records are handed over through a bounded queue and written by a small
//! pool of background tasks, so the thread driving call state never waits
//! on storage. Each record in a batch is written on its own: a failure (or
//! a panicking store) turns into [`WriteOutcome::Failed`] for that record
//! only. Failed writes are reported as warnings and otherwise forgotten.

use crate::config::WriterConfig;
use crate::domain::call_log::{CallLogStore, CallRecord, WriteOutcome, WriteState};
use crate::infrastructure::metrics;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Why a batch could not be queued
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    #[error("call log queue is full, dropped {0} record(s)")]
    QueueFull(usize),

    #[error("call log writer is stopped")]
    WriterStopped,
}

/// Hand-off point between the dispatcher and the persistence workers
#[cfg_attr(test, mockall::automock)]
pub trait RecordSubmitter: Send + Sync {
    /// Queue a batch for writing without waiting for it
    fn submit(&self, batch: Vec<CallRecord>) -> Result<(), DispatchError>;
}

/// Counters for records that went through the writer
#[derive(Debug, Default)]
pub struct WriterStats {
    submitted: AtomicU64,
    persisted: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`WriterStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStatsSnapshot {
    pub submitted: u64,
    pub persisted: u64,
    pub failed: u64,
    pub dropped: u64,
}

impl WriterStats {
    pub fn snapshot(&self) -> WriterStatsSnapshot {
        WriterStatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

type Batch = Vec<CallRecord>;

/// Background writer owning the queue and the worker tasks
pub struct CallLogWriter {
    tx: RwLock<Option<mpsc::Sender<Batch>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stats: Arc<WriterStats>,
}

impl CallLogWriter {
    /// Spawn the worker pool. Must be called from within a tokio runtime.
    pub fn start(store: Arc<dyn CallLogStore>, config: &WriterConfig) -> Self {
        let capacity = config.queue_capacity.max(1);
        let worker_count = config.workers.max(1);
        let (tx, rx) = mpsc::channel::<Batch>(capacity);
        let rx = Arc::new(Mutex::new(rx));
        let stats = Arc::new(WriterStats::default());

        let workers = (0..worker_count)
            .map(|worker_id| {
                let rx = rx.clone();
                let store = store.clone();
                let stats = stats.clone();
                tokio::spawn(async move {
                    Self::worker_loop(worker_id, rx, store, stats).await;
                })
            })
            .collect();

        info!(
            "Call log writer started with {} worker(s), queue capacity {}",
            worker_count, capacity
        );

        Self {
            tx: RwLock::new(Some(tx)),
            workers: Mutex::new(workers),
            stats,
        }
    }

    pub fn stats(&self) -> WriterStatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop accepting batches and wait until everything already queued is written
    pub async fn shutdown(&self) {
        self.tx.write().await.take();

        let workers = std::mem::take(&mut *self.workers.lock().await);
        for handle in workers {
            if let Err(e) = handle.await {
                error!("Call log worker terminated abnormally: {}", e);
            }
        }

        let stats = self.stats();
        info!(
            submitted = stats.submitted,
            persisted = stats.persisted,
            failed = stats.failed,
            dropped = stats.dropped,
            "Call log writer stopped"
        );
    }

    async fn worker_loop(
        worker_id: usize,
        rx: Arc<Mutex<mpsc::Receiver<Batch>>>,
        store: Arc<dyn CallLogStore>,
        stats: Arc<WriterStats>,
    ) {
        debug!("Call log worker {} running", worker_id);

        loop {
            let batch = { rx.lock().await.recv().await };
            let Some(batch) = batch else {
                break;
            };

            let outcomes = write_batch(store.as_ref(), &batch).await;
            for outcome in &outcomes {
                match outcome {
                    WriteOutcome::Persisted(_) => {
                        stats.persisted.fetch_add(1, Ordering::Relaxed);
                        metrics::record_call_written();
                    }
                    WriteOutcome::Failed => {
                        stats.failed.fetch_add(1, Ordering::Relaxed);
                        metrics::record_call_failed();
                    }
                }
            }
            inspect_outcomes(&outcomes);
        }

        debug!("Call log worker {} exiting", worker_id);
    }
}

impl RecordSubmitter for CallLogWriter {
    fn submit(&self, batch: Vec<CallRecord>) -> Result<(), DispatchError> {
        if batch.is_empty() {
            return Ok(());
        }

        // Only fails while shutdown holds the write lock.
        let Ok(guard) = self.tx.try_read() else {
            return Err(DispatchError::WriterStopped);
        };
        let Some(tx) = guard.as_ref() else {
            return Err(DispatchError::WriterStopped);
        };

        let count = batch.len();
        match tx.try_send(batch) {
            Ok(()) => {
                self.stats.submitted.fetch_add(count as u64, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(batch)) => {
                self.stats.dropped.fetch_add(batch.len() as u64, Ordering::Relaxed);
                metrics::record_calls_dropped(batch.len());
                warn!("Call log queue full, dropping {} record(s)", batch.len());
                Err(DispatchError::QueueFull(batch.len()))
            }
            Err(TrySendError::Closed(_)) => Err(DispatchError::WriterStopped),
        }
    }
}

/// Write every record of `batch`, one outcome per record, in order
pub async fn write_batch(store: &dyn CallLogStore, batch: &[CallRecord]) -> Vec<WriteOutcome> {
    let mut outcomes = Vec::with_capacity(batch.len());
    for record in batch {
        outcomes.push(write_record(store, record).await);
    }
    outcomes
}

async fn write_record(store: &dyn CallLogStore, record: &CallRecord) -> WriteOutcome {
    let mut state = WriteState::Submitted;
    advance(&mut state, WriteState::Writing);

    let write = async { store.add_call(record).await };
    let outcome = match AssertUnwindSafe(write).catch_unwind().await {
        Ok(Ok(handle)) => {
            debug!("Call log entry written: {}", handle);
            WriteOutcome::Persisted(handle)
        }
        Ok(Err(e)) => {
            // Happens legitimately, e.g. while the store is locked or encrypted.
            error!(error = %e, "Exception raised during adding call log entry");
            WriteOutcome::Failed
        }
        Err(_) => {
            error!("Call log store panicked while adding entry");
            WriteOutcome::Failed
        }
    };

    advance(&mut state, WriteState::from(outcome));
    outcome
}

fn advance(state: &mut WriteState, next: WriteState) {
    debug_assert!(state.can_transition_to(next), "{:?} -> {:?}", state, next);
    trace!(from = ?*state, to = ?next, "Call log write state changed");
    *state = next;
}

/// Report failed writes. Returns how many records failed.
pub fn inspect_outcomes(outcomes: &[WriteOutcome]) -> usize {
    let mut failed = 0;
    for outcome in outcomes {
        if outcome.is_failed() {
            warn!("Failed to write call to the log");
            failed += 1;
        }
    }
    failed
}
