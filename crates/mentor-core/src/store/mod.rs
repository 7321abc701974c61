//! Persistence seam.
//!
//! The planning code reads and writes through [`Store`] only. Calls are
//! independent: nothing here spans a transaction across calls, so
//! callers read, modify, then write.

pub mod memory;
pub mod postgres;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

use mentor_db::models::{DailyPlan, Profile, Subject, Topic};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage backend for profile, syllabus, and plan history.
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name for logs (e.g. "postgres", "memory").
    fn name(&self) -> &str;

    async fn get_profile(&self) -> Result<Option<Profile>>;

    /// Replace the singleton profile. Non-positive hours are rejected.
    async fn save_profile(&self, profile: &Profile) -> Result<()>;

    async fn list_subjects(&self) -> Result<Vec<Subject>>;

    /// Replace the subject list; topics of removed subjects go with them.
    async fn save_subjects(&self, subjects: &[Subject]) -> Result<()>;

    /// All topics in insertion order, confidence normalized.
    async fn list_topics(&self) -> Result<Vec<Topic>>;

    /// Replace the topic list.
    async fn save_topics(&self, topics: &[Topic]) -> Result<()>;

    /// Append a topic; an existing topic with the same id is replaced.
    async fn add_topic(&self, topic: &Topic) -> Result<()>;

    /// Overwrite an existing topic. Returns `false` if no topic has its id.
    async fn update_topic(&self, topic: &Topic) -> Result<bool>;

    /// Plan history ordered by date.
    async fn list_plans(&self) -> Result<Vec<DailyPlan>>;

    async fn get_plan(&self, date: NaiveDate) -> Result<Option<DailyPlan>>;

    /// Upsert by date: the stored plan for `plan.date` becomes `plan`.
    async fn save_plan(&self, plan: &DailyPlan) -> Result<()>;
}

// Compile-time assertion: Store must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Store) {}
};

/// Everything the planner needs, loaded in one go.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyState {
    pub profile: Option<Profile>,
    pub subjects: Vec<Subject>,
    pub topics: Vec<Topic>,
    pub history: Vec<DailyPlan>,
}

impl StudyState {
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn plan_for(&self, date: NaiveDate) -> Option<&DailyPlan> {
        self.history.iter().find(|p| p.date == date)
    }
}

/// Read the whole state from `store`.
pub async fn load_state(store: &dyn Store) -> Result<StudyState> {
    let profile = store.get_profile().await.context("failed to load profile")?;
    let subjects = store.list_subjects().await.context("failed to load subjects")?;
    let topics = store.list_topics().await.context("failed to load topics")?;
    let history = store.list_plans().await.context("failed to load plan history")?;
    Ok(StudyState {
        profile,
        subjects,
        topics,
        history,
    })
}
