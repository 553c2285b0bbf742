//! PostgreSQL implementation of the call log store

use crate::domain::call_log::{CallLogStore, CallRecord, StoreError};
use crate::domain::shared::value_objects::RecordHandle;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

pub struct PgCallLogStore {
    pool: PgPool,
}

impl PgCallLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        sqlx::Error::Database(db) if db.is_check_violation() => StoreError::Rejected(db.to_string()),
        other => StoreError::Database(other.to_string()),
    }
}

#[async_trait]
impl CallLogStore for PgCallLogStore {
    async fn add_call(&self, record: &CallRecord) -> Result<RecordHandle, StoreError> {
        let id = Uuid::new_v4();
        debug!("Inserting call log entry {}", id);

        let contact = record.contact_info();

        sqlx::query(
            r#"
            INSERT INTO call_log (
                id, number, presentation, call_type,
                date_millis, duration_secs,
                contact_name, number_label
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(record.number())
        .bind(record.presentation().code() as i16)
        .bind(record.call_type().code() as i16)
        .bind(record.timestamp_millis())
        .bind(record.duration_secs())
        .bind(contact.and_then(|c| c.name.as_deref()))
        .bind(contact.and_then(|c| c.number_label.as_deref()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert call log entry: {}", e);
            map_sqlx_error(e)
        })?;

        debug!("Call log entry inserted: {}", id);
        Ok(RecordHandle::from_uuid(id))
    }
}
