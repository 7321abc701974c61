//! Integration tests for the embedded migrations.
//!
//! Requires Docker (testcontainers) or `MENTOR_TEST_PG_URL`.

use sqlx::Row;

use mentor_db::pool;
use mentor_test_utils::{create_test_db, drop_test_db};

#[tokio::test]
async fn migrations_create_all_tables() {
    let (pool, db_name) = create_test_db().await;

    let rows = sqlx::query(
        "SELECT tablename::text AS name FROM pg_tables \
         WHERE schemaname = 'public' AND tablename <> '_sqlx_migrations' \
         ORDER BY tablename",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let names: Vec<String> = rows.iter().map(|r| r.get("name")).collect();
    assert_eq!(names, vec!["daily_plans", "profile", "subjects", "topics"]);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let (pool, db_name) = create_test_db().await;

    // Already applied by create_test_db; a second run is a no-op.
    pool::run_migrations(&pool).await.expect("rerun should succeed");

    let counts = pool::table_counts(&pool).await.unwrap();
    assert_eq!(counts.len(), 4);
    assert!(counts.iter().all(|(_, n)| *n == 0), "fresh db: {counts:?}");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn profile_rejects_non_positive_hours_at_schema_level() {
    let (pool, db_name) = create_test_db().await;

    let result = sqlx::query(
        "INSERT INTO profile (exam_date, daily_available_hours) VALUES ('2026-06-30', 0)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "CHECK constraint should reject 0 hours");

    pool.close().await;
    drop_test_db(&db_name).await;
}
