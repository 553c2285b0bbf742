//! PostgreSQL call log store integration tests
#![cfg(feature = "postgres")]

use calllog::config::{StoreConfig, StoreKind};
use calllog::domain::call_log::{CallLogStore, CallRecord, CallType, ContactInfo, NumberPresentation};
use calllog::infrastructure::persistence::{create_pool, run_migrations, PgCallLogStore};
use sqlx::{PgPool, Row};

async fn setup_database() -> PgPool {
    let config = StoreConfig {
        kind: StoreKind::Postgres,
        database_url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://postgres@localhost/calllog_test".to_string()),
        ..Default::default()
    };

    let pool = create_pool(&config).await.expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

async fn cleanup_database(pool: PgPool) {
    sqlx::query("DELETE FROM call_log")
        .execute(&pool)
        .await
        .expect("Failed to clean up call_log");
}

#[tokio::test]
#[ignore] // Requires database
async fn test_add_call_inserts_row() {
    let pool = setup_database().await;
    let store = PgCallLogStore::new(pool.clone());

    let record = CallRecord::new(
        None,
        Some("5551234567".to_string()),
        NumberPresentation::Allowed,
        CallType::Missed,
        1_700_000_000_000,
        65_432,
    );

    let handle = store.add_call(&record).await.expect("Failed to add call");

    let row = sqlx::query(
        "SELECT number, presentation, call_type, date_millis, duration_secs FROM call_log WHERE id = $1",
    )
    .bind(handle.as_uuid())
    .fetch_one(&pool)
    .await
    .expect("Row not found");

    assert_eq!(row.get::<Option<String>, _>("number").as_deref(), Some("5551234567"));
    assert_eq!(row.get::<i16, _>("presentation"), 1);
    assert_eq!(row.get::<i16, _>("call_type"), 3);
    assert_eq!(row.get::<i64, _>("date_millis"), 1_700_000_000_000);
    assert_eq!(row.get::<i64, _>("duration_secs"), 65);

    cleanup_database(pool).await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_add_call_with_contact_and_no_number() {
    let pool = setup_database().await;
    let store = PgCallLogStore::new(pool.clone());

    let record = CallRecord::new(
        Some(ContactInfo {
            name: Some("Alice".to_string()),
            number_label: Some("mobile".to_string()),
        }),
        None,
        NumberPresentation::Restricted,
        CallType::Incoming,
        0,
        0,
    );

    let handle = store.add_call(&record).await.expect("Failed to add call");

    let row = sqlx::query("SELECT number, contact_name, number_label FROM call_log WHERE id = $1")
        .bind(handle.as_uuid())
        .fetch_one(&pool)
        .await
        .expect("Row not found");

    assert_eq!(row.get::<Option<String>, _>("number"), None);
    assert_eq!(row.get::<Option<String>, _>("contact_name").as_deref(), Some("Alice"));
    assert_eq!(row.get::<Option<String>, _>("number_label").as_deref(), Some("mobile"));

    cleanup_database(pool).await;
}
