//! [`Store`] over PostgreSQL via the `mentor-db` query functions.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use mentor_db::models::{DailyPlan, Profile, Subject, Topic};
use mentor_db::queries::{plans, profile, subjects, topics};

use super::Store;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn get_profile(&self) -> Result<Option<Profile>> {
        profile::get_profile(&self.pool).await
    }

    async fn save_profile(&self, p: &Profile) -> Result<()> {
        profile::upsert_profile(&self.pool, p).await.map(|_| ())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        subjects::list_subjects(&self.pool).await
    }

    async fn save_subjects(&self, s: &[Subject]) -> Result<()> {
        subjects::replace_subjects(&self.pool, s).await
    }

    async fn list_topics(&self) -> Result<Vec<Topic>> {
        topics::list_topics(&self.pool).await
    }

    async fn save_topics(&self, t: &[Topic]) -> Result<()> {
        topics::replace_topics(&self.pool, t).await
    }

    async fn add_topic(&self, t: &Topic) -> Result<()> {
        topics::insert_topic(&self.pool, t).await
    }

    async fn update_topic(&self, t: &Topic) -> Result<bool> {
        Ok(topics::update_topic(&self.pool, t).await? > 0)
    }

    async fn list_plans(&self) -> Result<Vec<DailyPlan>> {
        plans::list_plans(&self.pool).await
    }

    async fn get_plan(&self, date: NaiveDate) -> Result<Option<DailyPlan>> {
        plans::get_plan(&self.pool, date).await
    }

    async fn save_plan(&self, plan: &DailyPlan) -> Result<()> {
        plans::upsert_plan(&self.pool, plan).await
    }
}
