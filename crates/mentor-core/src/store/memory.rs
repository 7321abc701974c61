//! In-memory [`Store`], used by tests and dry runs.

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use mentor_db::models::{DailyPlan, Profile, Subject, Topic};

use super::Store;

#[derive(Debug, Default)]
struct Inner {
    profile: Option<Profile>,
    subjects: Vec<Subject>,
    topics: Vec<Topic>,
    /// Kept sorted by date.
    plans: Vec<DailyPlan>,
}

/// Mutex-guarded collections with the same observable behavior as
/// [`super::PgStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with a profile and syllabus.
    pub fn with_state(profile: Profile, subjects: Vec<Subject>, topics: Vec<Topic>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                profile: Some(profile),
                subjects,
                topics,
                plans: Vec::new(),
            }),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_profile(&self) -> Result<Option<Profile>> {
        Ok(self.inner.lock().await.profile.clone())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        if !(profile.daily_available_hours > 0.0) {
            bail!(
                "daily_available_hours must be positive, got {}",
                profile.daily_available_hours
            );
        }
        self.inner.lock().await.profile = Some(profile.clone());
        Ok(())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.inner.lock().await.subjects.clone())
    }

    async fn save_subjects(&self, subjects: &[Subject]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.subjects = subjects.to_vec();
        inner
            .topics
            .retain(|t| subjects.iter().any(|s| s.id == t.subject_id));
        Ok(())
    }

    async fn list_topics(&self) -> Result<Vec<Topic>> {
        Ok(self.inner.lock().await.topics.clone())
    }

    async fn save_topics(&self, topics: &[Topic]) -> Result<()> {
        self.inner.lock().await.topics = topics.to_vec();
        Ok(())
    }

    async fn add_topic(&self, topic: &Topic) -> Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.topics.iter_mut().find(|t| t.id == topic.id) {
            Some(slot) => *slot = topic.clone(),
            None => inner.topics.push(topic.clone()),
        }
        Ok(())
    }

    async fn update_topic(&self, topic: &Topic) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        match inner.topics.iter_mut().find(|t| t.id == topic.id) {
            Some(slot) => {
                *slot = topic.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_plans(&self) -> Result<Vec<DailyPlan>> {
        Ok(self.inner.lock().await.plans.clone())
    }

    async fn get_plan(&self, date: NaiveDate) -> Result<Option<DailyPlan>> {
        Ok(self
            .inner
            .lock()
            .await
            .plans
            .iter()
            .find(|p| p.date == date)
            .cloned())
    }

    async fn save_plan(&self, plan: &DailyPlan) -> Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.plans.binary_search_by_key(&plan.date, |p| p.date) {
            Ok(i) => inner.plans[i] = plan.clone(),
            Err(i) => inner.plans.insert(i, plan.clone()),
        }
        Ok(())
    }
}
