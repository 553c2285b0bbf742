//! Call log store implementations

pub mod file;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod database;
#[cfg(feature = "postgres")]
pub mod call_log_repository;

pub use file::FileCallLogStore;
pub use memory::{MemoryCallLogStore, StoredCall};
#[cfg(feature = "postgres")]
pub use database::{create_pool, run_migrations};
#[cfg(feature = "postgres")]
pub use call_log_repository::PgCallLogStore;

use crate::config::{StoreConfig, StoreKind};
use crate::domain::call_log::{CallLogStore, StoreError};
use std::sync::Arc;
use tracing::info;

/// Build the store selected by `config.kind`
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn CallLogStore>, StoreError> {
    match config.kind {
        StoreKind::Memory => {
            info!("Using in-memory call log store");
            Ok(Arc::new(MemoryCallLogStore::new()))
        }
        StoreKind::File => {
            info!("Using call log file {}", config.path.display());
            Ok(Arc::new(FileCallLogStore::new(config.path.clone())))
        }
        #[cfg(feature = "postgres")]
        StoreKind::Postgres => {
            let pool = create_pool(config)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
            info!("Using PostgreSQL call log store");
            Ok(Arc::new(PgCallLogStore::new(pool)))
        }
        #[cfg(not(feature = "postgres"))]
        StoreKind::Postgres => Err(StoreError::Unavailable(
            "built without the postgres feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call_log::{CallRecord, CallType, NumberPresentation};

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(&StoreConfig::default()).await.unwrap();
        let record = CallRecord::new(None, None, NumberPresentation::Allowed, CallType::Incoming, 0, 0);
        assert!(store.add_call(&record).await.is_ok());
    }

    #[tokio::test]
    async fn test_open_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            kind: StoreKind::File,
            path: dir.path().join("calls.jsonl"),
            ..Default::default()
        };

        let store = open_store(&config).await.unwrap();
        let record = CallRecord::new(None, None, NumberPresentation::Allowed, CallType::Outgoing, 0, 0);
        store.add_call(&record).await.unwrap();
        assert!(config.path.exists());
    }
}
