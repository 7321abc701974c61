//! Onboarding import: a whole syllabus and profile from one TOML file.
//!
//! ```toml
//! [profile]
//! exam_date = "2026-06-30"
//! daily_available_hours = 4.0
//! preferred_study_time = "morning"
//!
//! [[subjects]]
//! id = "math"              # optional, minted when absent
//! name = "Mathematics"
//!
//! [[subjects.topics]]
//! id = "limits"            # optional, minted when absent
//! name = "Limits"
//! difficulty = "medium"    # easy | medium | hard (default medium)
//! estimated_hours = 2.0    # default 2.0
//! # status = "done"        # default pending
//! # is_hard_marked = true  # default: difficulty == hard
//! ```

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use mentor_db::models::{Difficulty, MAX_CONFIDENCE, Profile, Subject, Topic, TopicStatus};

use super::{new_subject_id, new_topic_id};
use crate::store::Store;

/// Errors from parsing or validating an onboarding file.
#[derive(Debug, Error)]
pub enum SyllabusImportError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid exam_date {0:?} (expected YYYY-MM-DD)")]
    InvalidExamDate(String),

    #[error("daily_available_hours must be positive, got {0}")]
    NonPositiveHours(f64),

    #[error("{kind} at position {position} has an empty name")]
    EmptyName { kind: &'static str, position: usize },

    #[error("duplicate subject id: {0:?}")]
    DuplicateSubjectId(String),

    #[error("duplicate topic id: {0:?}")]
    DuplicateTopicId(String),

    #[error("invalid difficulty {value:?} on topic {topic:?} (expected easy, medium, or hard)")]
    InvalidDifficulty { topic: String, value: String },

    #[error("invalid status {value:?} on topic {topic:?} (expected pending or done)")]
    InvalidStatus { topic: String, value: String },

    #[error("topic {topic:?} must have positive estimated_hours, got {value}")]
    InvalidEstimatedHours { topic: String, value: f64 },
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SyllabusFile {
    profile: ProfileSection,
    #[serde(default)]
    subjects: Vec<SubjectSection>,
}

#[derive(Debug, Deserialize)]
struct ProfileSection {
    exam_date: String,
    #[serde(default = "default_daily_hours")]
    daily_available_hours: f64,
    #[serde(default = "default_study_time")]
    preferred_study_time: String,
}

#[derive(Debug, Deserialize)]
struct SubjectSection {
    id: Option<String>,
    name: String,
    #[serde(default)]
    topics: Vec<TopicSection>,
}

#[derive(Debug, Deserialize)]
struct TopicSection {
    id: Option<String>,
    name: String,
    #[serde(default = "default_difficulty")]
    difficulty: String,
    #[serde(default = "default_topic_hours")]
    estimated_hours: f64,
    status: Option<String>,
    is_hard_marked: Option<bool>,
}

fn default_daily_hours() -> f64 {
    4.0
}

fn default_study_time() -> String {
    "morning".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_topic_hours() -> f64 {
    2.0
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A validated onboarding: the profile is marked as onboarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Onboarding {
    pub profile: Profile,
    pub subjects: Vec<Subject>,
    pub topics: Vec<Topic>,
}

/// Parse and validate an onboarding TOML string.
pub fn parse_syllabus_toml(content: &str) -> Result<Onboarding, SyllabusImportError> {
    let file: SyllabusFile = toml::from_str(content)?;

    let exam_date = NaiveDate::parse_from_str(&file.profile.exam_date, "%Y-%m-%d")
        .map_err(|_| SyllabusImportError::InvalidExamDate(file.profile.exam_date.clone()))?;
    let hours = file.profile.daily_available_hours;
    if !(hours.is_finite() && hours > 0.0) {
        return Err(SyllabusImportError::NonPositiveHours(hours));
    }

    let mut subject_ids = HashSet::new();
    let mut topic_ids = HashSet::new();
    let mut subjects = Vec::with_capacity(file.subjects.len());
    let mut topics = Vec::new();

    for (i, section) in file.subjects.into_iter().enumerate() {
        let name = section.name.trim().to_string();
        if name.is_empty() {
            return Err(SyllabusImportError::EmptyName {
                kind: "subject",
                position: i + 1,
            });
        }
        let subject_id = section.id.unwrap_or_else(new_subject_id);
        if !subject_ids.insert(subject_id.clone()) {
            return Err(SyllabusImportError::DuplicateSubjectId(subject_id));
        }

        for (j, t) in section.topics.into_iter().enumerate() {
            topics.push(build_topic(t, &subject_id, j + 1, &mut topic_ids)?);
        }
        subjects.push(Subject {
            id: subject_id,
            name,
        });
    }

    Ok(Onboarding {
        profile: Profile {
            exam_date,
            daily_available_hours: hours,
            preferred_study_time: file.profile.preferred_study_time,
            onboarding_completed: true,
        },
        subjects,
        topics,
    })
}

fn build_topic(
    t: TopicSection,
    subject_id: &str,
    position: usize,
    seen: &mut HashSet<String>,
) -> Result<Topic, SyllabusImportError> {
    let name = t.name.trim().to_string();
    if name.is_empty() {
        return Err(SyllabusImportError::EmptyName {
            kind: "topic",
            position,
        });
    }

    let difficulty: Difficulty =
        t.difficulty
            .parse()
            .map_err(|_| SyllabusImportError::InvalidDifficulty {
                topic: name.clone(),
                value: t.difficulty.clone(),
            })?;
    let status: TopicStatus = match t.status {
        None => TopicStatus::Pending,
        Some(s) => s.parse().map_err(|_| SyllabusImportError::InvalidStatus {
            topic: name.clone(),
            value: s.clone(),
        })?,
    };
    if !(t.estimated_hours.is_finite() && t.estimated_hours > 0.0) {
        return Err(SyllabusImportError::InvalidEstimatedHours {
            topic: name,
            value: t.estimated_hours,
        });
    }

    let id = t.id.unwrap_or_else(new_topic_id);
    if !seen.insert(id.clone()) {
        return Err(SyllabusImportError::DuplicateTopicId(id));
    }

    Ok(Topic {
        id,
        subject_id: subject_id.to_string(),
        name,
        difficulty,
        estimated_hours: t.estimated_hours,
        status,
        is_hard_marked: t.is_hard_marked.unwrap_or(difficulty == Difficulty::Hard),
        exposure_count: 0,
        confidence_score: match status {
            TopicStatus::Done => MAX_CONFIDENCE,
            TopicStatus::Pending => 0,
        },
    })
}

/// Replace the stored profile and syllabus with `onboarding`.
///
/// Plan history is kept.
pub async fn apply_onboarding(store: &dyn Store, onboarding: &Onboarding) -> Result<()> {
    store
        .save_profile(&onboarding.profile)
        .await
        .context("failed to save profile")?;
    store
        .save_subjects(&onboarding.subjects)
        .await
        .context("failed to save subjects")?;
    store
        .save_topics(&onboarding.topics)
        .await
        .context("failed to save topics")?;

    tracing::info!(
        subjects = onboarding.subjects.len(),
        topics = onboarding.topics.len(),
        exam_date = %onboarding.profile.exam_date,
        "onboarding applied"
    );
    Ok(())
}
