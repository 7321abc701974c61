//! Syllabus operations.
//!
//! The functions in this module are pure: they take and return values.
//! [`service`] applies them through a [`crate::store::Store`], and
//! [`import`] builds a whole syllabus from an onboarding file.

pub mod import;
pub mod service;

use uuid::Uuid;

use mentor_db::models::{DailyPlan, MAX_CONFIDENCE, Topic, TopicStatus, TopicSuggestion};

/// Confidence gained by finishing a topic.
pub const DONE_CONFIDENCE_GAIN: i32 = 100;

/// Mark `topic` done: one more exposure, confidence raised and capped.
pub fn mark_topic_done(topic: &Topic) -> Topic {
    Topic {
        status: TopicStatus::Done,
        exposure_count: topic.exposure_count.saturating_add(1),
        confidence_score: topic
            .confidence_score
            .saturating_add(DONE_CONFIDENCE_GAIN)
            .min(MAX_CONFIDENCE),
        ..topic.clone()
    }
}

pub fn toggle_hard_mark(topic: &Topic) -> Topic {
    Topic {
        is_hard_marked: !topic.is_hard_marked,
        ..topic.clone()
    }
}

/// Fresh id for a topic minted by the system.
pub fn new_topic_id() -> String {
    format!("topic-{}", Uuid::new_v4().simple())
}

/// Fresh id for a subject minted by the system.
pub fn new_subject_id() -> String {
    format!("subject-{}", Uuid::new_v4().simple())
}

/// Turn an accepted suggestion into a pending syllabus topic.
pub fn approve_suggestion(suggestion: &TopicSuggestion) -> Topic {
    Topic {
        id: new_topic_id(),
        subject_id: suggestion.subject_id.clone(),
        name: suggestion.name.clone(),
        difficulty: suggestion.difficulty,
        estimated_hours: suggestion.estimated_hours,
        status: TopicStatus::Pending,
        is_hard_marked: false,
        exposure_count: 0,
        confidence_score: 0,
    }
}

/// True when every item of `plan` references a topic that is done.
///
/// Items whose topic no longer exists count as not done. A plan with no
/// items is complete.
pub fn plan_is_complete(plan: &DailyPlan, topics: &[Topic]) -> bool {
    plan.items.iter().all(|item| {
        topics
            .iter()
            .find(|t| t.id == item.topic_id)
            .is_some_and(Topic::is_done)
    })
}

/// Drop suggestions whose name already exists in `subject_id`,
/// compared case-insensitively.
pub fn filter_new_suggestions(
    suggestions: Vec<TopicSuggestion>,
    topics: &[Topic],
    subject_id: &str,
) -> Vec<TopicSuggestion> {
    let existing: Vec<String> = topics
        .iter()
        .filter(|t| t.subject_id == subject_id)
        .map(|t| t.name.to_lowercase())
        .collect();
    suggestions
        .into_iter()
        .filter(|s| !existing.contains(&s.name.to_lowercase()))
        .collect()
}
