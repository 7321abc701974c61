//! Shared test utilities for mentor integration tests.
//!
//! Provides one PostgreSQL server per test binary; every test gets its own
//! freshly migrated database on it, plus a small seeded syllabus.
//!
//! Two modes:
//! - **`MENTOR_TEST_PG_URL`** set: use that server directly.
//! - **No env var**: start a container via testcontainers, shared per
//!   binary through a `OnceCell`.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use mentor_db::models::{Difficulty, Profile, Subject, Topic, TopicStatus};
use mentor_db::pool;
use mentor_db::queries::{profile, subjects, topics};

struct SharedPg {
    base_url: String,
    /// Keeps the container alive. `None` when using an external URL.
    _container: Option<ContainerAsync<Postgres>>,
}

static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

async fn init_shared_pg() -> SharedPg {
    if let Ok(url) = std::env::var("MENTOR_TEST_PG_URL") {
        return SharedPg {
            base_url: url,
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("17")
        .start()
        .await
        .expect("failed to start PostgreSQL container");

    let host = container.get_host().await.expect("failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped port");

    SharedPg {
        base_url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _container: Some(container),
    }
}

/// Server root URL (no database name) of the shared PostgreSQL.
pub async fn pg_url() -> &'static str {
    let shared = SHARED_PG.get_or_init(init_shared_pg).await;
    &shared.base_url
}

async fn maintenance_pool() -> PgPool {
    let maint_url = format!("{}/postgres", pg_url().await);
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&maint_url)
        .await
        .expect("failed to connect to maintenance database")
}

/// Create a uniquely named, migrated database.
///
/// Returns `(pool, db_name)`; pass `db_name` to [`drop_test_db`] when done.
pub async fn create_test_db() -> (PgPool, String) {
    let maint_pool = maintenance_pool().await;
    let db_name = format!("mentor_test_{}", Uuid::new_v4().simple());
    maint_pool
        .execute(format!("CREATE DATABASE {db_name}").as_str())
        .await
        .unwrap_or_else(|e| panic!("failed to create temp database {db_name}: {e}"));
    maint_pool.close().await;

    let temp_url = format!("{}/{db_name}", pg_url().await);
    let temp_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&temp_url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to temp database {db_name}: {e}"));

    pool::run_migrations(&temp_pool)
        .await
        .expect("migrations should succeed");

    (temp_pool, db_name)
}

/// Drop a database created by [`create_test_db`], terminating its sessions.
pub async fn drop_test_db(db_name: &str) {
    let maint_pool = maintenance_pool().await;

    let terminate = format!(
        "SELECT pg_terminate_backend(pid) \
         FROM pg_stat_activity \
         WHERE datname = '{db_name}' AND pid <> pg_backend_pid()"
    );
    let _ = maint_pool.execute(terminate.as_str()).await;
    let _ = maint_pool
        .execute(format!("DROP DATABASE IF EXISTS {db_name}").as_str())
        .await;
    maint_pool.close().await;
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Profile with a 4-hour budget and an exam on 2026-06-30.
pub fn sample_profile() -> Profile {
    Profile {
        exam_date: NaiveDate::from_ymd_opt(2026, 6, 30).expect("valid date"),
        daily_available_hours: 4.0,
        preferred_study_time: "morning".to_string(),
        onboarding_completed: true,
    }
}

/// Build a topic with neutral defaults for the remaining fields.
pub fn topic(id: &str, subject_id: &str, difficulty: Difficulty, status: TopicStatus) -> Topic {
    Topic {
        id: id.to_string(),
        subject_id: subject_id.to_string(),
        name: format!("Topic {id}"),
        difficulty,
        estimated_hours: 2.0,
        status,
        is_hard_marked: false,
        exposure_count: 0,
        confidence_score: if status == TopicStatus::Done { 100 } else { 0 },
    }
}

/// Two subjects with three topics each: one of each difficulty, the
/// `*-easy` topic already done.
pub fn sample_syllabus() -> (Vec<Subject>, Vec<Topic>) {
    let subjects = vec![
        Subject {
            id: "math".to_string(),
            name: "Mathematics".to_string(),
        },
        Subject {
            id: "phys".to_string(),
            name: "Physics".to_string(),
        },
    ];

    let mut all = Vec::new();
    for s in &subjects {
        all.push(topic(&format!("{}-easy", s.id), &s.id, Difficulty::Easy, TopicStatus::Done));
        all.push(topic(
            &format!("{}-medium", s.id),
            &s.id,
            Difficulty::Medium,
            TopicStatus::Pending,
        ));
        all.push(topic(&format!("{}-hard", s.id), &s.id, Difficulty::Hard, TopicStatus::Pending));
    }

    (subjects, all)
}

/// Write [`sample_profile`] and [`sample_syllabus`] into `pool`.
pub async fn seed_syllabus(pool: &PgPool) {
    let (subject_rows, topic_rows) = sample_syllabus();
    profile::upsert_profile(pool, &sample_profile())
        .await
        .expect("seed profile");
    subjects::replace_subjects(pool, &subject_rows)
        .await
        .expect("seed subjects");
    topics::replace_topics(pool, &topic_rows)
        .await
        .expect("seed topics");
}
