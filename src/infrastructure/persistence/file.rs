//! JSON lines call log store
//!
//! Each record becomes one line appended to a file. Lines carry the numeric
//! type and presentation codes so the file can be loaded into other call
//! log tooling as-is.

use crate::domain::call_log::{CallLogStore, CallRecord, StoreError};
use crate::domain::shared::value_objects::RecordHandle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// One line of the call log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogLine {
    pub id: Uuid,
    pub number: Option<String>,
    pub presentation: i32,
    #[serde(rename = "type")]
    pub call_type: i32,
    pub date: i64,
    pub duration: i64,
    pub written_at: DateTime<Utc>,
}

impl CallLogLine {
    fn new(handle: RecordHandle, record: &CallRecord) -> Self {
        Self {
            id: handle.as_uuid(),
            number: record.number().map(str::to_string),
            presentation: record.presentation().code(),
            call_type: record.call_type().code(),
            date: record.timestamp_millis(),
            duration: record.duration_secs(),
            written_at: Utc::now(),
        }
    }
}

pub struct FileCallLogStore {
    path: PathBuf,
    // Keeps concurrent workers from interleaving partial lines.
    write_lock: Mutex<()>,
}

impl FileCallLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CallLogStore for FileCallLogStore {
    async fn add_call(&self, record: &CallRecord) -> Result<RecordHandle, StoreError> {
        let handle = RecordHandle::new();
        let mut line = serde_json::to_string(&CallLogLine::new(handle, record))
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", self.path.display(), e)))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        file.flush().await.map_err(|e| StoreError::Io(e.to_string()))?;

        debug!("Appended call log entry {} to {}", handle, self.path.display());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call_log::{CallType, NumberPresentation};

    fn record(number: Option<&str>, call_type: CallType) -> CallRecord {
        CallRecord::new(
            None,
            number.map(str::to_string),
            NumberPresentation::Allowed,
            call_type,
            1_700_000_000_000,
            42_500,
        )
    }

    #[tokio::test]
    async fn test_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCallLogStore::new(dir.path().join("calls.jsonl"));

        let first = store.add_call(&record(Some("5551234567"), CallType::Outgoing)).await.unwrap();
        let second = store.add_call(&record(None, CallType::Missed)).await.unwrap();

        let contents = tokio::fs::read_to_string(store.path()).await.unwrap();
        let lines: Vec<CallLogLine> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, first.as_uuid());
        assert_eq!(lines[0].number.as_deref(), Some("5551234567"));
        assert_eq!(lines[0].call_type, 2);
        assert_eq!(lines[0].presentation, 1);
        assert_eq!(lines[0].date, 1_700_000_000_000);
        assert_eq!(lines[0].duration, 42);
        assert_eq!(lines[1].id, second.as_uuid());
        assert_eq!(lines[1].number, None);
        assert_eq!(lines[1].call_type, 3);
    }

    #[tokio::test]
    async fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCallLogStore::new(dir.path().join("missing").join("calls.jsonl"));

        let err = store
            .add_call(&record(Some("5551234567"), CallType::Incoming))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
