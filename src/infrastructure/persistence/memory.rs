//! In-memory call log store

use crate::domain::call_log::{CallLogStore, CallRecord, StoreError};
use crate::domain::shared::value_objects::RecordHandle;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// A record as kept by [`MemoryCallLogStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCall {
    pub handle: RecordHandle,
    pub record: CallRecord,
    pub written_at: DateTime<Utc>,
}

/// Call log store backed by a `Vec`.
///
/// Can be locked to reject writes, the way an encrypted device store does
/// before it is unlocked.
#[derive(Default)]
pub struct MemoryCallLogStore {
    records: Arc<RwLock<Vec<StoredCall>>>,
    locked: AtomicBool,
    write_delay: Option<Duration>,
}

impl MemoryCallLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` on every write, simulating a slow medium
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<StoredCall> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl CallLogStore for MemoryCallLogStore {
    async fn add_call(&self, record: &CallRecord) -> Result<RecordHandle, StoreError> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }

        if self.locked.load(Ordering::SeqCst) {
            return Err(StoreError::Locked);
        }

        let handle = RecordHandle::new();
        let mut records = self.records.write().await;
        records.push(StoredCall {
            handle,
            record: record.clone(),
            written_at: Utc::now(),
        });

        debug!("Stored call log entry {} ({} total)", handle, records.len());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call_log::{CallType, NumberPresentation};

    fn record() -> CallRecord {
        CallRecord::new(
            None,
            Some("5551234567".to_string()),
            NumberPresentation::Allowed,
            CallType::Missed,
            1_000,
            0,
        )
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let store = MemoryCallLogStore::new();
        assert!(store.is_empty().await);

        let handle = store.add_call(&record()).await.unwrap();

        let records = store.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].handle, handle);
        assert_eq!(records[0].record, record());
    }

    #[tokio::test]
    async fn test_locked_store_rejects_writes() {
        let store = MemoryCallLogStore::new();
        store.set_locked(true);
        assert_eq!(store.add_call(&record()).await, Err(StoreError::Locked));
        assert_eq!(store.len().await, 0);

        store.set_locked(false);
        assert!(store.add_call(&record()).await.is_ok());
        assert_eq!(store.len().await, 1);
    }
}
